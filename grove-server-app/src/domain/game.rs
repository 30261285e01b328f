use chrono::{DateTime, Utc};
use grove_core::GameType;

use crate::domain::{
    GameId, Pagination, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub slug: String,
    pub game_url: String,
    pub game_type: GameType,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub categories: Option<String>,
    pub play_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Case-insensitive match on title or slug, or on the id's decimal digits.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.slug.to_lowercase().contains(&term)
            || self.id.0.to_string().contains(&term)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewGame {
    pub title: String,
    pub slug: String,
    pub game_url: String,
    pub game_type: GameType,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub categories: Option<String>,
}

/// Fields left as `None` are not touched. For the optional columns,
/// `Some(None)` clears the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub game_url: Option<String>,
    pub game_type: Option<GameType>,
    pub thumbnail_url: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub categories: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameOrder {
    #[default]
    Newest,
    MostPlayed,
}

#[derive(Debug, Clone, Default)]
pub struct GameQuery {
    pub order: GameOrder,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameSelection {
    All,
    Ids(Vec<GameId>),
}

#[async_trait::async_trait]
pub trait GameRepository {
    async fn create_game(&self, game: NewGame) -> Result<Game, RepoCreateError>;
    async fn get_game(&self, id: GameId) -> Result<Game, RepoRetrieveError>;
    async fn get_game_by_slug(&self, slug: &str) -> Result<Game, RepoRetrieveError>;
    async fn query_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError>;
    async fn update_game(&self, id: GameId, changes: GameChanges)
    -> Result<Game, RepoUpdateError>;
    /// Removes the game together with its comments and ratings.
    async fn delete_game(&self, id: GameId) -> Result<(), RepoRetrieveError>;
    async fn delete_games(&self, selection: GameSelection) -> Result<u64, RepoError>;
    /// Returns the play count after the increment.
    async fn increment_play_count(&self, id: GameId) -> Result<i64, RepoRetrieveError>;
    async fn overwrite_play_counts(
        &self,
        value_fn: impl Fn() -> i64 + Send + Sync + 'static,
    ) -> Result<u64, RepoError>;
}
