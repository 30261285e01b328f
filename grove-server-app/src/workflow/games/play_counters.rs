use std::{ops::RangeInclusive, sync::Arc};

use rand::Rng;

use crate::domain::{RepoError, game::GameRepository};

pub const RANDOM_PLAY_COUNT_RANGE: RangeInclusive<i64> = 5000..=85000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCounterMode {
    Reset,
    Randomize,
}

impl std::str::FromStr for PlayCounterMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reset" => Ok(PlayCounterMode::Reset),
            "randomize" => Ok(PlayCounterMode::Randomize),
            _ => Err(()),
        }
    }
}

#[async_trait::async_trait]
pub trait PlayCountersUseCase {
    /// Overwrites the play count of every game and returns how many changed.
    async fn set_play_counters(&self, mode: PlayCounterMode) -> Result<u64, PlayCountersError>;
}

#[derive(Debug, PartialEq)]
pub enum PlayCountersError {
    RepositoryError,
}

pub struct PlayCountersUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> PlayCountersUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> PlayCountersUseCase
    for PlayCountersUseCaseImpl<G>
{
    async fn set_play_counters(&self, mode: PlayCounterMode) -> Result<u64, PlayCountersError> {
        let result = match mode {
            PlayCounterMode::Reset => self.game_repository.overwrite_play_counts(|| 0).await,
            PlayCounterMode::Randomize => {
                self.game_repository
                    .overwrite_play_counts(|| rand::rng().random_range(RANDOM_PLAY_COUNT_RANGE))
                    .await
            }
        };
        match result {
            Ok(updated) => {
                log::info!("Set play counters ({:?}) on {} games", mode, updated);
                Ok(updated)
            }
            Err(RepoError::StorageError(e)) => {
                log::error!("Error overwriting play counters: {}", e);
                Err(PlayCountersError::RepositoryError)
            }
        }
    }
}
