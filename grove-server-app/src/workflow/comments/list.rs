use std::sync::Arc;

use crate::domain::{
    GameId, RepoError,
    comment::{CommentQuery, CommentRepository, CommentWithGame},
};

#[async_trait::async_trait]
pub trait ListCommentsUseCase {
    /// Only approved comments unless `include_unapproved` is set.
    async fn list_comments(
        &self,
        game_id: Option<GameId>,
        include_unapproved: bool,
    ) -> Result<Vec<CommentWithGame>, ListCommentsError>;
}

#[derive(Debug, PartialEq)]
pub enum ListCommentsError {
    RepositoryError,
}

pub struct ListCommentsUseCaseImpl<C: CommentRepository> {
    comment_repository: Arc<C>,
}

impl<C: CommentRepository> ListCommentsUseCaseImpl<C> {
    pub fn new(comment_repository: Arc<C>) -> Self {
        Self { comment_repository }
    }
}

#[async_trait::async_trait]
impl<C: CommentRepository + Send + Sync + 'static> ListCommentsUseCase
    for ListCommentsUseCaseImpl<C>
{
    async fn list_comments(
        &self,
        game_id: Option<GameId>,
        include_unapproved: bool,
    ) -> Result<Vec<CommentWithGame>, ListCommentsError> {
        let query = CommentQuery {
            game_id,
            approved_only: !include_unapproved,
        };
        match self.comment_repository.get_comments(query).await {
            Ok(comments) => Ok(comments),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error listing comments: {}", e);
                Err(ListCommentsError::RepositoryError)
            }
        }
    }
}
