use std::sync::Arc;

use crate::{
    domain::{
        GameId, Pagination, RepoError, RepoRetrieveError,
        game::{Game, GameOrder, GameQuery, GameRepository},
    },
    ports::catalog::{CatalogError, CatalogGame, CatalogSource},
};

impl From<Game> for CatalogGame {
    fn from(game: Game) -> Self {
        CatalogGame {
            id: game.id.0,
            title: game.title,
            slug: game.slug,
            game_url: game.game_url,
            game_type: Some(game.game_type),
            thumbnail_url: game.thumbnail_url,
            description: game.description,
            categories: game.categories,
            play_count: game.play_count,
            width: None,
            height: None,
        }
    }
}

/// Serves the public catalog straight from the game repository.
pub struct DatabaseCatalogSource<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> DatabaseCatalogSource<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }

    async fn query(&self, order: GameOrder, limit: usize) -> Result<Vec<CatalogGame>, CatalogError> {
        let query = GameQuery {
            order,
            pagination: Pagination::limit(limit),
        };
        match self.game_repository.query_games(query).await {
            Ok(games) => Ok(games.into_iter().map(CatalogGame::from).collect()),
            Err(RepoError::StorageError(e)) => {
                log::error!("Error querying catalog games: {}", e);
                Err(CatalogError::Unavailable(e))
            }
        }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> CatalogSource for DatabaseCatalogSource<G> {
    async fn latest(&self, limit: usize) -> Result<Vec<CatalogGame>, CatalogError> {
        self.query(GameOrder::Newest, limit).await
    }

    async fn popular(&self, limit: usize) -> Result<Vec<CatalogGame>, CatalogError> {
        self.query(GameOrder::MostPlayed, limit).await
    }

    async fn by_slug(&self, slug: &str) -> Result<Option<CatalogGame>, CatalogError> {
        match self.game_repository.get_game_by_slug(slug).await {
            Ok(game) => Ok(Some(game.into())),
            Err(RepoRetrieveError::NotFound) => Ok(None),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error getting catalog game by slug: {}", e);
                Err(CatalogError::Unavailable(e))
            }
        }
    }

    async fn record_play(&self, id: i64) -> Result<serde_json::Value, CatalogError> {
        match self.game_repository.increment_play_count(GameId(id)).await {
            Ok(play_count) => Ok(serde_json::json!({ "playCount": play_count })),
            Err(RepoRetrieveError::NotFound) => Err(CatalogError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Error recording play for game {}: {}", id, e);
                Err(CatalogError::Unavailable(e))
            }
        }
    }
}
