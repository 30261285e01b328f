use std::sync::Arc;

use crate::domain::{
    GameId, RepoError, RepoRetrieveError,
    game::{GameRepository, GameSelection},
};

#[async_trait::async_trait]
pub trait DeleteGameUseCase {
    async fn delete_game(&self, id: GameId) -> Result<(), DeleteGameError>;
    /// Returns how many games were removed.
    async fn delete_games(&self, selection: GameSelection) -> Result<u64, DeleteGameError>;
}

#[derive(Debug, PartialEq)]
pub enum DeleteGameError {
    GameNotFound,
    RepositoryError,
}

pub struct DeleteGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> DeleteGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> DeleteGameUseCase for DeleteGameUseCaseImpl<G> {
    async fn delete_game(&self, id: GameId) -> Result<(), DeleteGameError> {
        match self.game_repository.delete_game(id).await {
            Ok(()) => {
                log::info!("Deleted game {}", id);
                Ok(())
            }
            Err(RepoRetrieveError::NotFound) => Err(DeleteGameError::GameNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error deleting game {}: {}", id, e);
                Err(DeleteGameError::RepositoryError)
            }
        }
    }

    async fn delete_games(&self, selection: GameSelection) -> Result<u64, DeleteGameError> {
        if let GameSelection::Ids(ids) = &selection
            && ids.is_empty()
        {
            return Ok(0);
        }
        match self.game_repository.delete_games(selection).await {
            Ok(deleted) => {
                log::info!("Bulk deleted {} games", deleted);
                Ok(deleted)
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Error bulk deleting games: {}", e);
                Err(DeleteGameError::RepositoryError)
            }
        }
    }
}
