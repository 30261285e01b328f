use std::sync::Arc;

use crate::domain::{GameId, RepoRetrieveError, game::GameRepository};

#[async_trait::async_trait]
pub trait RecordPlayUseCase {
    /// Returns the play count after this play.
    async fn record_play(&self, id: GameId) -> Result<i64, RecordPlayError>;
}

#[derive(Debug, PartialEq)]
pub enum RecordPlayError {
    GameNotFound,
    RepositoryError,
}

pub struct RecordPlayUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> RecordPlayUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> RecordPlayUseCase for RecordPlayUseCaseImpl<G> {
    async fn record_play(&self, id: GameId) -> Result<i64, RecordPlayError> {
        match self.game_repository.increment_play_count(id).await {
            Ok(count) => Ok(count),
            Err(RepoRetrieveError::NotFound) => Err(RecordPlayError::GameNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error recording play for game {}: {}", id, e);
                Err(RecordPlayError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        testing::InMemoryStore,
        workflow::games::{
            GameInput,
            create::{CreateGameUseCase, CreateGameUseCaseImpl},
        },
    };

    #[tokio::test]
    async fn test_record_play() {
        let store = Arc::new(InMemoryStore::new());
        let game = CreateGameUseCaseImpl::new(store.clone())
            .create_game(GameInput {
                title: Some("Doom".to_string()),
                game_url: Some("/roms/doom.zip".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let use_case = RecordPlayUseCaseImpl::new(store);
        assert_eq!(use_case.record_play(game.id).await, Ok(1));
        assert_eq!(use_case.record_play(game.id).await, Ok(2));
        assert_eq!(
            use_case.record_play(GameId(42)).await,
            Err(RecordPlayError::GameNotFound)
        );
    }
}
