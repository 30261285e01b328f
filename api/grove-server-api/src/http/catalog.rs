use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use grove_server_app::{
    ports::catalog::CatalogGame,
    workflow::catalog::{
        browse::{BrowseCatalogError, DEFAULT_LATEST_LIMIT, DEFAULT_POPULAR_LIMIT},
        record_view::RecordViewError,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    AppState, ServiceError,
    http::{ApiJson, ApiQuery, id_from_value},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCatalogGame {
    id: i64,
    title: String,
    slug: String,
    game_url: String,
    embed_url: String,
    game_type: Option<String>,
    thumbnail_url: Option<String>,
    description: Option<String>,
    categories: Option<String>,
    play_count: i64,
    width: Option<i64>,
    height: Option<i64>,
}

impl From<CatalogGame> for JsonCatalogGame {
    fn from(game: CatalogGame) -> Self {
        JsonCatalogGame {
            embed_url: game.embed_url().to_string(),
            id: game.id,
            title: game.title,
            slug: game.slug,
            game_url: game.game_url,
            game_type: game.game_type.map(|t| t.to_string()),
            thumbnail_url: game.thumbnail_url,
            description: game.description,
            categories: game.categories,
            play_count: game.play_count,
            width: game.width,
            height: game.height,
        }
    }
}

#[derive(Serialize)]
pub struct JsonHomeFeed {
    slider: Vec<JsonCatalogGame>,
    grid: Vec<JsonCatalogGame>,
}

#[derive(Deserialize)]
pub struct LimitParams {
    limit: Option<usize>,
}

fn browse_error(e: BrowseCatalogError) -> ServiceError {
    match e {
        BrowseCatalogError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
        BrowseCatalogError::SourceUnavailable => {
            ServiceError::Internal("Failed to fetch games".to_string())
        }
    }
}

fn to_json(games: Vec<CatalogGame>) -> Vec<JsonCatalogGame> {
    games.into_iter().map(JsonCatalogGame::from).collect()
}

pub async fn latest(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<LimitParams>,
) -> Result<Json<Vec<JsonCatalogGame>>, ServiceError> {
    let games = state
        .app
        .catalog_browse_use_case
        .latest(params.limit.unwrap_or(DEFAULT_LATEST_LIMIT))
        .await
        .map_err(browse_error)?;
    Ok(Json(to_json(games)))
}

pub async fn popular(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<LimitParams>,
) -> Result<Json<Vec<JsonCatalogGame>>, ServiceError> {
    let games = state
        .app
        .catalog_browse_use_case
        .popular(params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT))
        .await
        .map_err(browse_error)?;
    Ok(Json(to_json(games)))
}

pub async fn home(State(state): State<AppState>) -> Result<Json<JsonHomeFeed>, ServiceError> {
    let feed = state
        .app
        .catalog_browse_use_case
        .home()
        .await
        .map_err(browse_error)?;
    Ok(Json(JsonHomeFeed {
        slider: to_json(feed.slider),
        grid: to_json(feed.grid),
    }))
}

pub async fn game_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JsonCatalogGame>, ServiceError> {
    let game = state
        .app
        .catalog_browse_use_case
        .game_by_slug(&slug)
        .await
        .map_err(browse_error)?;
    Ok(Json(game.into()))
}

pub async fn record_view(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<Value>,
) -> Result<Json<Value>, ServiceError> {
    let id = id_from_value(body.get("id"))
        .ok_or_else(|| ServiceError::BadRequest("Missing ID".to_string()))?;
    let ack = state
        .app
        .catalog_record_view_use_case
        .record_view(id)
        .await
        .map_err(|e| match e {
            RecordViewError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
            RecordViewError::Upstream(status) => {
                ServiceError::Upstream(status, "Failed to update WP".to_string())
            }
            RecordViewError::SourceUnavailable => {
                ServiceError::Internal("Internal Server Error".to_string())
            }
        })?;
    Ok(Json(ack))
}
