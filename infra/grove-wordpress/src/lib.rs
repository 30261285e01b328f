use std::{sync::Arc, time::Duration};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use thiserror::Error;

use grove_server_app::ports::catalog::{CatalogError, CatalogGame, CatalogSource};

const CACHE_TTL: Duration = Duration::from_secs(60);
const POPULAR_FALLBACK_POOL: usize = 60;

const GAME_FIELDS_FRAGMENT: &str = r#"
fragment GameFields on Game {
  id
  databaseId
  title
  slug
  gameUrl
  thumbnailUrl
  totalPlays
  gameWidth
  gameHeight
  content
}
"#;

const LATEST_GAMES_QUERY: &str = r#"
query GetGames($first: Int) {
  games(first: $first, where: { orderby: { field: DATE, order: DESC } }) {
    edges { node { ...GameFields } }
  }
}
"#;

const POPULAR_GAMES_QUERY: &str = r#"
query GetPopularGames($first: Int) {
  games(first: $first, where: { orderby: { field: TOTAL_PLAYS, order: DESC } }) {
    edges { node { ...GameFields } }
  }
}
"#;

const GAME_BY_SLUG_QUERY: &str = r#"
query GetGameBySlug($id: ID!) {
  game(id: $id, idType: SLUG) { ...GameFields }
}
"#;

#[derive(Debug, Error)]
pub enum WordPressError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(u16),
    #[error("GraphQL errors: {0}")]
    GraphQl(serde_json::Value),
    #[error("Response carried no data")]
    MissingData,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GamesData {
    games: Option<GameConnection>,
}

#[derive(Debug, Deserialize)]
struct GameConnection {
    #[serde(default)]
    edges: Vec<GameEdge>,
}

#[derive(Debug, Deserialize)]
struct GameEdge {
    node: WpGame,
}

#[derive(Debug, Deserialize)]
struct GameData {
    game: Option<WpGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WpGame {
    database_id: i64,
    title: Option<String>,
    slug: Option<String>,
    game_url: Option<String>,
    thumbnail_url: Option<String>,
    total_plays: Option<i64>,
    game_width: Option<i64>,
    game_height: Option<i64>,
    content: Option<String>,
}

impl From<WpGame> for CatalogGame {
    fn from(game: WpGame) -> Self {
        CatalogGame {
            id: game.database_id,
            title: game.title.unwrap_or_default(),
            slug: game.slug.unwrap_or_default(),
            game_url: game.game_url.unwrap_or_default(),
            game_type: None,
            thumbnail_url: game.thumbnail_url.filter(|t| !t.is_empty()),
            description: game.content.filter(|c| !c.is_empty()),
            categories: None,
            play_count: game.total_plays.unwrap_or(0),
            width: game.game_width,
            height: game.game_height,
        }
    }
}

impl From<GamesData> for Vec<CatalogGame> {
    fn from(data: GamesData) -> Self {
        data.games
            .map(|c| c.edges.into_iter().map(|e| e.node.into()).collect())
            .unwrap_or_default()
    }
}

/// Fresh reads get a timestamp query parameter so edge caches are bypassed.
fn request_url(endpoint: &str, fresh: bool) -> String {
    if fresh {
        format!("{}?t={}", endpoint, chrono::Utc::now().timestamp_millis())
    } else {
        endpoint.to_string()
    }
}

fn most_played(mut games: Vec<CatalogGame>, limit: usize) -> Vec<CatalogGame> {
    games.sort_by(|a, b| b.play_count.cmp(&a.play_count));
    games.truncate(limit);
    games
}

#[derive(Clone, Debug)]
pub struct WordPressConfig {
    pub graphql_endpoint: String,
    pub rest_api_url: String,
}

impl WordPressConfig {
    pub fn from_env() -> Self {
        let graphql_endpoint = std::env::var("WORDPRESS_GRAPHQL_ENDPOINT")
            .expect("WORDPRESS_GRAPHQL_ENDPOINT must be set");
        let rest_api_url =
            std::env::var("WORDPRESS_REST_API_URL").expect("WORDPRESS_REST_API_URL must be set");
        Self {
            graphql_endpoint,
            rest_api_url: rest_api_url.trim_end_matches('/').to_string(),
        }
    }
}

pub struct WordPressCatalogSource {
    client: reqwest::Client,
    config: WordPressConfig,
    feed_cache: Arc<moka::future::Cache<String, Vec<CatalogGame>>>,
}

impl WordPressCatalogSource {
    pub fn new() -> Self {
        Self::with_config(WordPressConfig::from_env())
    }

    pub fn with_config(config: WordPressConfig) -> Self {
        let feed_cache = Arc::new(
            moka::future::Cache::builder()
                .max_capacity(64)
                .time_to_live(CACHE_TTL)
                .build(),
        );
        Self {
            client: reqwest::Client::new(),
            config,
            feed_cache,
        }
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        fresh: bool,
    ) -> Result<T, WordPressError> {
        let body = json!({
            "query": format!("{}{}", GAME_FIELDS_FRAGMENT, query),
            "variables": variables,
        });
        let response = self
            .client
            .post(request_url(&self.config.graphql_endpoint, fresh))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WordPressError::Status(response.status().as_u16()));
        }
        let response: GraphQlResponse<T> = response.json().await?;
        if let Some(errors) = response.errors {
            return Err(WordPressError::GraphQl(errors));
        }
        response.data.ok_or(WordPressError::MissingData)
    }

    async fn cached_feed(
        &self,
        feed: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CatalogGame>, WordPressError> {
        let key = format!("{}:{}", feed, limit);
        if let Some(cached) = self.feed_cache.get(&key).await {
            return Ok(cached);
        }
        let data: GamesData = self
            .graphql(query, json!({ "first": limit }), false)
            .await?;
        let games: Vec<CatalogGame> = data.into();
        self.feed_cache.insert(key, games.clone()).await;
        Ok(games)
    }
}

#[async_trait::async_trait]
impl CatalogSource for WordPressCatalogSource {
    async fn latest(&self, limit: usize) -> Result<Vec<CatalogGame>, CatalogError> {
        match self.cached_feed("latest", LATEST_GAMES_QUERY, limit).await {
            Ok(games) => Ok(games),
            Err(e) => {
                log::error!("Failed to fetch games: {}", e);
                Ok(vec![])
            }
        }
    }

    async fn popular(&self, limit: usize) -> Result<Vec<CatalogGame>, CatalogError> {
        let primary_error = match self.cached_feed("popular", POPULAR_GAMES_QUERY, limit).await {
            Ok(games) => return Ok(games),
            Err(e) => e,
        };
        log::warn!(
            "Popular query failed ({}), falling back to sorting the newest games",
            primary_error
        );
        match self
            .cached_feed("latest", LATEST_GAMES_QUERY, POPULAR_FALLBACK_POOL)
            .await
        {
            Ok(games) => Ok(most_played(games, limit)),
            Err(e) => {
                log::error!("Popular fallback query failed too: {}", e);
                Ok(vec![])
            }
        }
    }

    async fn by_slug(&self, slug: &str) -> Result<Option<CatalogGame>, CatalogError> {
        match self
            .graphql::<GameData>(GAME_BY_SLUG_QUERY, json!({ "id": slug }), true)
            .await
        {
            Ok(data) => Ok(data.game.map(CatalogGame::from)),
            Err(e) => {
                log::error!("Failed to fetch game by slug '{}': {}", slug, e);
                Ok(None)
            }
        }
    }

    async fn record_play(&self, id: i64) -> Result<serde_json::Value, CatalogError> {
        let url = format!("{}/play/{}", self.config.rest_api_url, id);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("WordPress play endpoint returned {} for {}", status, id);
            return Err(CatalogError::Upstream(status.as_u16()));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_games_connection() {
        let body = json!({
            "data": {
                "games": {
                    "edges": [
                        { "node": {
                            "id": "cG9zdDoxMg==",
                            "databaseId": 12,
                            "title": "Moto X3M",
                            "slug": "moto-x3m",
                            "gameUrl": "<iframe src=\"https://embed.test/moto\"></iframe>",
                            "thumbnailUrl": "",
                            "totalPlays": 310,
                            "gameWidth": 800,
                            "gameHeight": null,
                            "content": "<p>Ride!</p>"
                        } }
                    ]
                }
            }
        });
        let response: GraphQlResponse<GamesData> = serde_json::from_value(body).unwrap();
        assert!(response.errors.is_none());
        let games: Vec<CatalogGame> = response.data.unwrap().into();
        assert_eq!(games.len(), 1);
        let game = &games[0];
        assert_eq!(game.id, 12);
        assert_eq!(game.play_count, 310);
        assert_eq!(game.thumbnail_url, None);
        assert_eq!(game.width, Some(800));
        assert_eq!(game.height, None);
        assert_eq!(game.embed_url(), "https://embed.test/moto");
    }

    #[test]
    fn test_parse_errors_and_missing_game() {
        let body = json!({ "errors": [{ "message": "Unknown field TOTAL_PLAYS" }], "data": null });
        let response: GraphQlResponse<GamesData> = serde_json::from_value(body).unwrap();
        assert!(response.errors.is_some());

        let body = json!({ "data": { "game": null } });
        let response: GraphQlResponse<GameData> = serde_json::from_value(body).unwrap();
        assert!(response.data.unwrap().game.is_none());

        let body = json!({ "data": { "games": null } });
        let response: GraphQlResponse<GamesData> = serde_json::from_value(body).unwrap();
        let games: Vec<CatalogGame> = response.data.unwrap().into();
        assert!(games.is_empty());
    }

    #[test]
    fn test_most_played() {
        let game = |id: i64, plays: i64| CatalogGame {
            id,
            title: String::new(),
            slug: String::new(),
            game_url: String::new(),
            game_type: None,
            thumbnail_url: None,
            description: None,
            categories: None,
            play_count: plays,
            width: None,
            height: None,
        };
        let sorted = most_played(vec![game(1, 5), game(2, 50), game(3, 0), game(4, 20)], 2);
        let ids: Vec<_> = sorted.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_request_url() {
        assert_eq!(
            request_url("https://wp.test/graphql", false),
            "https://wp.test/graphql"
        );
        assert!(request_url("https://wp.test/graphql", true).starts_with("https://wp.test/graphql?t="));
    }

    #[tokio::test]
    async fn test_unreachable_backend_degrades_to_empty() {
        let source = WordPressCatalogSource::with_config(WordPressConfig {
            graphql_endpoint: "http://127.0.0.1:9/graphql".to_string(),
            rest_api_url: "http://127.0.0.1:9/wp-json/grove-api/v1".to_string(),
        });
        assert_eq!(source.latest(10).await, Ok(vec![]));
        assert_eq!(source.popular(5).await, Ok(vec![]));
        assert_eq!(source.by_slug("missing").await, Ok(None));
        assert!(matches!(
            source.record_play(1).await,
            Err(CatalogError::Unavailable(_))
        ));
    }
}
