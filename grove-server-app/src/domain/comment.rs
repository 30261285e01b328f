use chrono::{DateTime, Utc};
use rustrict::{Censor, Type};

use crate::domain::{CommentId, GameId, RepoError, RepoRetrieveError, RepoUpdateError};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub game_id: GameId,
    pub content: String,
    pub author: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentWithGame {
    pub comment: Comment,
    pub game_title: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewComment {
    pub game_id: GameId,
    pub content: String,
    pub author: String,
}

#[derive(Clone, Debug, Default)]
pub struct CommentQuery {
    pub game_id: Option<GameId>,
    pub approved_only: bool,
}

#[async_trait::async_trait]
pub trait CommentRepository {
    /// New comments are stored unapproved.
    async fn create_comment(&self, comment: NewComment) -> Result<Comment, RepoError>;
    /// Newest first.
    async fn get_comments(&self, query: CommentQuery) -> Result<Vec<CommentWithGame>, RepoError>;
    async fn set_approved(&self, id: CommentId, approved: bool) -> Result<(), RepoUpdateError>;
    async fn delete_comment(&self, id: CommentId) -> Result<(), RepoRetrieveError>;
}

pub trait ContentPolicy {
    fn filter_message(&self, message: &str) -> String;
}

pub struct RustrictContentPolicy;

impl RustrictContentPolicy {
    pub fn new() -> Self {
        Self {}
    }
}

impl ContentPolicy for RustrictContentPolicy {
    fn filter_message(&self, message: &str) -> String {
        let (censored, censor_type) = Censor::from_str(message)
            .with_censor_threshold(Type::INAPPROPRIATE)
            .censor_and_analyze();
        if censor_type.is(Type::INAPPROPRIATE) {
            censored
        } else {
            message.to_string()
        }
    }
}
