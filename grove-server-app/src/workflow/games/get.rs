use std::sync::Arc;

use crate::domain::{
    GameId, RepoRetrieveError,
    game::{Game, GameRepository},
};

#[async_trait::async_trait]
pub trait GetGameUseCase {
    async fn get_game(&self, id: GameId) -> Result<Game, GetGameError>;
    async fn get_game_by_slug(&self, slug: &str) -> Result<Game, GetGameError>;
}

#[derive(Debug, PartialEq)]
pub enum GetGameError {
    GameNotFound,
    RepositoryError,
}

impl From<RepoRetrieveError> for GetGameError {
    fn from(e: RepoRetrieveError) -> Self {
        match e {
            RepoRetrieveError::NotFound => GetGameError::GameNotFound,
            RepoRetrieveError::StorageError(e) => {
                log::error!("Error getting game: {}", e);
                GetGameError::RepositoryError
            }
        }
    }
}

pub struct GetGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> GetGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> GetGameUseCase for GetGameUseCaseImpl<G> {
    async fn get_game(&self, id: GameId) -> Result<Game, GetGameError> {
        Ok(self.game_repository.get_game(id).await?)
    }

    async fn get_game_by_slug(&self, slug: &str) -> Result<Game, GetGameError> {
        Ok(self.game_repository.get_game_by_slug(slug).await?)
    }
}
