use crate::domain::{GameId, RepoError};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u64,
}

impl RatingSummary {
    pub fn from_values(values: &[i32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let sum: i64 = values.iter().map(|&v| v as i64).sum();
        Self {
            average: sum as f64 / values.len() as f64,
            count: values.len() as u64,
        }
    }
}

#[async_trait::async_trait]
pub trait RatingRepository {
    async fn add_rating(&self, game_id: GameId, value: i32) -> Result<(), RepoError>;
    async fn get_rating_values(&self, game_id: GameId) -> Result<Vec<i32>, RepoError>;
}
