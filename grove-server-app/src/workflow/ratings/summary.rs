use std::sync::Arc;

use crate::domain::{
    GameId, RepoError,
    rating::{RatingRepository, RatingSummary},
};

#[async_trait::async_trait]
pub trait RatingSummaryUseCase {
    async fn get_summary(&self, game_id: GameId) -> Result<RatingSummary, RatingSummaryError>;
}

#[derive(Debug, PartialEq)]
pub enum RatingSummaryError {
    RepositoryError,
}

pub struct RatingSummaryUseCaseImpl<R: RatingRepository> {
    rating_repository: Arc<R>,
}

impl<R: RatingRepository> RatingSummaryUseCaseImpl<R> {
    pub fn new(rating_repository: Arc<R>) -> Self {
        Self { rating_repository }
    }
}

#[async_trait::async_trait]
impl<R: RatingRepository + Send + Sync + 'static> RatingSummaryUseCase
    for RatingSummaryUseCaseImpl<R>
{
    async fn get_summary(&self, game_id: GameId) -> Result<RatingSummary, RatingSummaryError> {
        match self.rating_repository.get_rating_values(game_id).await {
            Ok(values) => Ok(RatingSummary::from_values(&values)),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error reading ratings for game {}: {}", game_id, e);
                Err(RatingSummaryError::RepositoryError)
            }
        }
    }
}
