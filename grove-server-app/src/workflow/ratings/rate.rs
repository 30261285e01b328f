use std::sync::Arc;

use crate::domain::{
    GameId, RepoError, RepoRetrieveError,
    game::GameRepository,
    rating::{RatingRepository, RatingSummary},
};

#[async_trait::async_trait]
pub trait RateGameUseCase {
    /// Stores the rating and returns the game's updated aggregate.
    async fn rate_game(&self, game_id: GameId, value: i32)
    -> Result<RatingSummary, RateGameError>;
}

#[derive(Debug, PartialEq)]
pub enum RateGameError {
    InvalidValue,
    GameNotFound,
    RepositoryError,
}

pub struct RateGameUseCaseImpl<G: GameRepository, R: RatingRepository> {
    game_repository: Arc<G>,
    rating_repository: Arc<R>,
}

impl<G: GameRepository, R: RatingRepository> RateGameUseCaseImpl<G, R> {
    pub fn new(game_repository: Arc<G>, rating_repository: Arc<R>) -> Self {
        Self {
            game_repository,
            rating_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static, R: RatingRepository + Send + Sync + 'static>
    RateGameUseCase for RateGameUseCaseImpl<G, R>
{
    async fn rate_game(
        &self,
        game_id: GameId,
        value: i32,
    ) -> Result<RatingSummary, RateGameError> {
        if !grove_core::is_valid_rating(value) {
            return Err(RateGameError::InvalidValue);
        }
        match self.game_repository.get_game(game_id).await {
            Ok(_) => {}
            Err(RepoRetrieveError::NotFound) => return Err(RateGameError::GameNotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting game {} for rating: {}", game_id, e);
                return Err(RateGameError::RepositoryError);
            }
        }
        if let Err(RepoError::StorageError(e)) =
            self.rating_repository.add_rating(game_id, value).await
        {
            log::error!("Error storing rating for game {}: {}", game_id, e);
            return Err(RateGameError::RepositoryError);
        }
        match self.rating_repository.get_rating_values(game_id).await {
            Ok(values) => Ok(RatingSummary::from_values(&values)),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error reading ratings for game {}: {}", game_id, e);
                Err(RateGameError::RepositoryError)
            }
        }
    }
}
