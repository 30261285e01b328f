use grove_core::GameType;

/// A game as shown on the public site, independent of the backend it was read
/// from.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogGame {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub game_url: String,
    pub game_type: Option<GameType>,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub categories: Option<String>,
    pub play_count: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl CatalogGame {
    pub fn embed_url(&self) -> &str {
        grove_core::clean_embed_url(&self.game_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound,
    /// The upstream content API answered with a non-success status.
    Upstream(u16),
    Unavailable(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound => write!(f, "Game not found"),
            CatalogError::Upstream(status) => write!(f, "Upstream returned status {}", status),
            CatalogError::Unavailable(e) => write!(f, "Catalog unavailable: {}", e),
        }
    }
}

#[async_trait::async_trait]
pub trait CatalogSource {
    /// Newest games first.
    async fn latest(&self, limit: usize) -> Result<Vec<CatalogGame>, CatalogError>;
    /// Most played games first.
    async fn popular(&self, limit: usize) -> Result<Vec<CatalogGame>, CatalogError>;
    /// Always reads fresh data so that play counts are current.
    async fn by_slug(&self, slug: &str) -> Result<Option<CatalogGame>, CatalogError>;
    /// Counts one play and returns the backend's acknowledgement payload.
    async fn record_play(&self, id: i64) -> Result<serde_json::Value, CatalogError>;
}
