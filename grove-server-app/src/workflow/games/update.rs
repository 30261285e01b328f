use std::sync::Arc;

use crate::{
    domain::{
        GameId, RepoUpdateError,
        game::{Game, GameRepository},
    },
    workflow::games::{GameInput, GameValidationError, validate_changes},
};

#[async_trait::async_trait]
pub trait UpdateGameUseCase {
    async fn update_game(&self, id: GameId, input: GameInput) -> Result<Game, UpdateGameError>;
}

#[derive(Debug, PartialEq)]
pub enum UpdateGameError {
    Invalid(GameValidationError),
    GameNotFound,
    SlugTaken,
    RepositoryError,
}

pub struct UpdateGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> UpdateGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> UpdateGameUseCase for UpdateGameUseCaseImpl<G> {
    async fn update_game(&self, id: GameId, input: GameInput) -> Result<Game, UpdateGameError> {
        let changes = validate_changes(input).map_err(UpdateGameError::Invalid)?;
        match self.game_repository.update_game(id, changes).await {
            Ok(game) => Ok(game),
            Err(RepoUpdateError::NotFound) => Err(UpdateGameError::GameNotFound),
            Err(RepoUpdateError::Conflict) => Err(UpdateGameError::SlugTaken),
            Err(RepoUpdateError::StorageError(e)) => {
                log::error!("Error updating game {}: {}", id, e);
                Err(UpdateGameError::RepositoryError)
            }
        }
    }
}
