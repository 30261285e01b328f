use std::sync::Arc;

use crate::{
    domain::{RepoCreateError, game::GameRepository},
    workflow::games::{GameInput, validate_new_game},
};

#[async_trait::async_trait]
pub trait BulkCreateGamesUseCase {
    /// Inserts each game independently and returns how many were created.
    /// An `Err` item is an element that could not be read and counts as a
    /// failed item. Duplicate slugs are skipped; the call only fails when
    /// nothing was inserted and some item failed for another reason.
    async fn create_games(
        &self,
        inputs: Vec<Result<GameInput, String>>,
    ) -> Result<usize, BulkCreateError>;
}

#[derive(Debug, PartialEq)]
pub enum BulkCreateError {
    /// Every item failed; carries the first failure message.
    AllFailed(String),
}

pub struct BulkCreateGamesUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> BulkCreateGamesUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> BulkCreateGamesUseCase
    for BulkCreateGamesUseCaseImpl<G>
{
    async fn create_games(
        &self,
        inputs: Vec<Result<GameInput, String>>,
    ) -> Result<usize, BulkCreateError> {
        let total = inputs.len();
        let mut created = 0;
        let mut first_error: Option<String> = None;

        for input in inputs {
            let input = match input {
                Ok(input) => input,
                Err(e) => {
                    log::warn!("Skipping unreadable game in bulk insert: {}", e);
                    first_error.get_or_insert(e);
                    continue;
                }
            };
            let new_game = match validate_new_game(input) {
                Ok(new_game) => new_game,
                Err(e) => {
                    log::warn!("Skipping invalid game in bulk insert: {}", e);
                    first_error.get_or_insert(e.to_string());
                    continue;
                }
            };
            let slug = new_game.slug.clone();
            match self.game_repository.create_game(new_game).await {
                Ok(_) => created += 1,
                Err(RepoCreateError::Conflict) => {
                    log::debug!("Skipping duplicate slug '{}' in bulk insert", slug);
                }
                Err(RepoCreateError::StorageError(e)) => {
                    log::error!("Error inserting game '{}': {}", slug, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if created == 0
            && let Some(e) = first_error
        {
            return Err(BulkCreateError::AllFailed(e));
        }
        log::info!("Bulk inserted {} of {} games", created, total);
        Ok(created)
    }
}
