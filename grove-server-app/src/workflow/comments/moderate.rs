use std::sync::Arc;

use crate::domain::{
    CommentId, RepoRetrieveError, RepoUpdateError, comment::CommentRepository,
};

#[async_trait::async_trait]
pub trait ModerateCommentUseCase {
    async fn set_approved(&self, id: CommentId, approved: bool) -> Result<(), ModerateCommentError>;
    async fn delete_comment(&self, id: CommentId) -> Result<(), ModerateCommentError>;
}

#[derive(Debug, PartialEq)]
pub enum ModerateCommentError {
    CommentNotFound,
    RepositoryError,
}

pub struct ModerateCommentUseCaseImpl<C: CommentRepository> {
    comment_repository: Arc<C>,
}

impl<C: CommentRepository> ModerateCommentUseCaseImpl<C> {
    pub fn new(comment_repository: Arc<C>) -> Self {
        Self { comment_repository }
    }
}

#[async_trait::async_trait]
impl<C: CommentRepository + Send + Sync + 'static> ModerateCommentUseCase
    for ModerateCommentUseCaseImpl<C>
{
    async fn set_approved(&self, id: CommentId, approved: bool) -> Result<(), ModerateCommentError> {
        match self.comment_repository.set_approved(id, approved).await {
            Ok(()) => {
                log::info!("Comment {} approved={}", id, approved);
                Ok(())
            }
            Err(RepoUpdateError::NotFound) => Err(ModerateCommentError::CommentNotFound),
            Err(RepoUpdateError::Conflict) => Err(ModerateCommentError::RepositoryError),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Error moderating comment {}: {}", id, e);
                Err(ModerateCommentError::RepositoryError)
            }
        }
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), ModerateCommentError> {
        match self.comment_repository.delete_comment(id).await {
            Ok(()) => Ok(()),
            Err(RepoRetrieveError::NotFound) => Err(ModerateCommentError::CommentNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error deleting comment {}: {}", id, e);
                Err(ModerateCommentError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::comment::{ContentPolicy, RustrictContentPolicy},
        testing::InMemoryStore,
        workflow::{
            comments::{
                list::{ListCommentsUseCase, ListCommentsUseCaseImpl},
                post::{CommentSubmission, PostCommentUseCase, PostCommentUseCaseImpl},
            },
            games::{
                GameInput,
                create::{CreateGameUseCase, CreateGameUseCaseImpl},
            },
        },
    };

    async fn post<P: ContentPolicy + Send + Sync + 'static>(
        use_case: &PostCommentUseCaseImpl<InMemoryStore, InMemoryStore, P>,
        game_id: crate::domain::GameId,
        content: &str,
    ) -> CommentId {
        use_case
            .post_comment(CommentSubmission {
                game_id: Some(game_id),
                content: Some(content.to_string()),
                author: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_moderation_controls_visibility() {
        let store = Arc::new(InMemoryStore::new());
        let game = CreateGameUseCaseImpl::new(store.clone())
            .create_game(GameInput {
                title: Some("Galaga".to_string()),
                game_url: Some("/roms/galaga.zip".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let poster = PostCommentUseCaseImpl::new(
            store.clone(),
            store.clone(),
            Arc::new(RustrictContentPolicy::new()),
        );
        let first = post(&poster, game.id, "first").await;
        let second = post(&poster, game.id, "second").await;

        let list = ListCommentsUseCaseImpl::new(store.clone());
        let moderate = ModerateCommentUseCaseImpl::new(store.clone());

        assert!(list.list_comments(Some(game.id), false).await.unwrap().is_empty());
        let all = list.list_comments(None, true).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].comment.id, second);
        assert_eq!(all[0].game_title, "Galaga");

        moderate.set_approved(first, true).await.unwrap();
        let public = list.list_comments(Some(game.id), false).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].comment.id, first);

        moderate.delete_comment(first).await.unwrap();
        assert_eq!(
            moderate.delete_comment(first).await,
            Err(ModerateCommentError::CommentNotFound)
        );
        assert_eq!(
            moderate.set_approved(CommentId(999), true).await,
            Err(ModerateCommentError::CommentNotFound)
        );
    }
}
