use std::sync::Arc;

use crate::{
    domain::{
        RepoCreateError,
        game::{Game, GameRepository},
    },
    workflow::games::{GameInput, GameValidationError, validate_new_game},
};

#[async_trait::async_trait]
pub trait CreateGameUseCase {
    async fn create_game(&self, input: GameInput) -> Result<Game, CreateGameError>;
}

#[derive(Debug, PartialEq)]
pub enum CreateGameError {
    Invalid(GameValidationError),
    SlugTaken(String),
    RepositoryError,
}

pub struct CreateGameUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> CreateGameUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> CreateGameUseCase for CreateGameUseCaseImpl<G> {
    async fn create_game(&self, input: GameInput) -> Result<Game, CreateGameError> {
        let new_game = validate_new_game(input).map_err(CreateGameError::Invalid)?;
        let slug = new_game.slug.clone();
        match self.game_repository.create_game(new_game).await {
            Ok(game) => {
                log::info!("Created game {} ({})", game.id, game.slug);
                Ok(game)
            }
            Err(RepoCreateError::Conflict) => Err(CreateGameError::SlugTaken(slug)),
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Error creating game: {}", e);
                Err(CreateGameError::RepositoryError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryStore;

    fn input(title: &str) -> GameInput {
        GameInput {
            title: Some(title.to_string()),
            game_url: Some("/roms/game.nes".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_game() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = CreateGameUseCaseImpl::new(store.clone());
        let game = use_case.create_game(input("Metroid")).await.unwrap();
        assert_eq!(game.slug, "metroid");
        assert_eq!(game.play_count, 0);
    }

    #[tokio::test]
    async fn test_create_game_duplicate_slug() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = CreateGameUseCaseImpl::new(store.clone());
        use_case.create_game(input("Metroid")).await.unwrap();
        assert_eq!(
            use_case.create_game(input("metroid")).await,
            Err(CreateGameError::SlugTaken("metroid".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_game_invalid() {
        let store = Arc::new(InMemoryStore::new());
        let use_case = CreateGameUseCaseImpl::new(store);
        assert_eq!(
            use_case.create_game(GameInput::default()).await,
            Err(CreateGameError::Invalid(GameValidationError::MissingTitle))
        );
    }
}
