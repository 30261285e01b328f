use std::sync::Arc;

use validator::Validate;

use crate::domain::{
    GameId, RepoError, RepoRetrieveError,
    comment::{ANONYMOUS_AUTHOR, Comment, CommentRepository, ContentPolicy, NewComment},
    game::GameRepository,
};

#[derive(Clone, Debug, Default)]
pub struct CommentSubmission {
    pub game_id: Option<GameId>,
    pub content: Option<String>,
    pub author: Option<String>,
}

#[derive(Validate)]
struct CommentDraft {
    #[validate(length(min = 1, max = 2000))]
    content: String,
    #[validate(length(min = 1, max = 64))]
    author: String,
}

#[async_trait::async_trait]
pub trait PostCommentUseCase {
    async fn post_comment(&self, submission: CommentSubmission)
    -> Result<Comment, PostCommentError>;
}

#[derive(Debug, PartialEq)]
pub enum PostCommentError {
    MissingFields,
    Invalid(String),
    GameNotFound,
    RepositoryError,
}

pub struct PostCommentUseCaseImpl<G: GameRepository, C: CommentRepository, P: ContentPolicy> {
    game_repository: Arc<G>,
    comment_repository: Arc<C>,
    content_policy: Arc<P>,
}

impl<G: GameRepository, C: CommentRepository, P: ContentPolicy> PostCommentUseCaseImpl<G, C, P> {
    pub fn new(game_repository: Arc<G>, comment_repository: Arc<C>, content_policy: Arc<P>) -> Self {
        Self {
            game_repository,
            comment_repository,
            content_policy,
        }
    }
}

#[async_trait::async_trait]
impl<
    G: GameRepository + Send + Sync + 'static,
    C: CommentRepository + Send + Sync + 'static,
    P: ContentPolicy + Send + Sync + 'static,
> PostCommentUseCase for PostCommentUseCaseImpl<G, C, P>
{
    async fn post_comment(
        &self,
        submission: CommentSubmission,
    ) -> Result<Comment, PostCommentError> {
        let content = submission
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let (Some(game_id), Some(content)) = (submission.game_id, content) else {
            return Err(PostCommentError::MissingFields);
        };
        let author = submission
            .author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string());

        let draft = CommentDraft { content, author };
        if let Err(e) = draft.validate() {
            return Err(PostCommentError::Invalid(format!("Invalid comment: {}", e)));
        }

        match self.game_repository.get_game(game_id).await {
            Ok(_) => {}
            Err(RepoRetrieveError::NotFound) => return Err(PostCommentError::GameNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting game {} for comment: {}", game_id, e);
                return Err(PostCommentError::RepositoryError);
            }
        }

        let new_comment = NewComment {
            game_id,
            content: self.content_policy.filter_message(&draft.content),
            author: self.content_policy.filter_message(&draft.author),
        };
        match self.comment_repository.create_comment(new_comment).await {
            Ok(comment) => Ok(comment),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error storing comment for game {}: {}", game_id, e);
                Err(PostCommentError::RepositoryError)
            }
        }
    }
}
