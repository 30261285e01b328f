use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use grove_server_app::{
    domain::{
        GameId, Pagination,
        game::{Game, GameSelection},
    },
    workflow::games::{
        GameInput, bulk_create::BulkCreateError, create::CreateGameError,
        delete::DeleteGameError, get::GetGameError, list::ListGamesError,
        play::RecordPlayError, play_counters::PlayCounterMode,
        play_counters::PlayCountersError, update::UpdateGameError,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AdminAuth, AppState, ServiceError,
    http::{ApiJson, ApiPath, ApiQuery, format_timestamp},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGame {
    id: i64,
    title: String,
    slug: String,
    game_url: String,
    game_type: String,
    thumbnail_url: Option<String>,
    description: Option<String>,
    categories: Option<String>,
    play_count: i64,
    created_at: String,
    updated_at: String,
}

impl From<Game> for JsonGame {
    fn from(game: Game) -> Self {
        JsonGame {
            id: game.id.0,
            title: game.title,
            slug: game.slug,
            game_url: game.game_url,
            game_type: game.game_type.to_string(),
            thumbnail_url: game.thumbnail_url,
            description: game.description,
            categories: game.categories,
            play_count: game.play_count,
            created_at: format_timestamp(game.created_at),
            updated_at: format_timestamp(game.updated_at),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JsonGameInput {
    title: Option<String>,
    slug: Option<String>,
    game_url: Option<String>,
    game_type: Option<String>,
    thumbnail_url: Option<String>,
    description: Option<String>,
    categories: Option<String>,
}

impl From<JsonGameInput> for GameInput {
    fn from(input: JsonGameInput) -> Self {
        GameInput {
            title: input.title,
            slug: input.slug,
            game_url: input.game_url,
            game_type: input.game_type,
            thumbnail_url: input.thumbnail_url,
            description: input.description,
            categories: input.categories,
        }
    }
}

#[derive(Deserialize)]
pub struct ListGamesParams {
    q: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

fn parse_input(value: Value) -> Result<GameInput, ServiceError> {
    serde_json::from_value::<JsonGameInput>(value)
        .map(GameInput::from)
        .map_err(|e| ServiceError::BadRequest(format!("Invalid game: {}", e)))
}

fn get_error(e: GetGameError) -> ServiceError {
    match e {
        GetGameError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
        GetGameError::RepositoryError => {
            ServiceError::Internal("Failed to fetch game".to_string())
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<ListGamesParams>,
) -> Result<Json<Vec<JsonGame>>, ServiceError> {
    let pagination = Pagination {
        offset: params.offset,
        limit: params.limit,
    };
    let games = state
        .app
        .game_list_use_case
        .list_games(params.q, pagination)
        .await
        .map_err(|ListGamesError::RepositoryError| {
            ServiceError::Internal("Failed to fetch games".to_string())
        })?;
    Ok(Json(games.into_iter().map(JsonGame::from).collect()))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<i64>,
) -> Result<Json<JsonGame>, ServiceError> {
    let game = state
        .app
        .game_get_use_case
        .get_game(GameId(id))
        .await
        .map_err(get_error)?;
    Ok(Json(game.into()))
}

pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JsonGame>, ServiceError> {
    let game = state
        .app
        .game_get_use_case
        .get_game_by_slug(&slug)
        .await
        .map_err(get_error)?;
    Ok(Json(game.into()))
}

/// An object body creates one game; an array body is a bulk import batch.
pub async fn create(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<Value>,
) -> Result<Json<Value>, ServiceError> {
    match body {
        Value::Array(items) => {
            let inputs = items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<JsonGameInput>(item)
                        .map(GameInput::from)
                        .map_err(|e| e.to_string())
                })
                .collect();
            let count = state
                .app
                .game_bulk_create_use_case
                .create_games(inputs)
                .await
                .map_err(|BulkCreateError::AllFailed(e)| {
                    ServiceError::Internal(format!("All items failed. Sample error: {}", e))
                })?;
            Ok(Json(json!({ "count": count })))
        }
        body => {
            let game = state
                .app
                .game_create_use_case
                .create_game(parse_input(body)?)
                .await
                .map_err(|e| match e {
                    CreateGameError::Invalid(e) => ServiceError::BadRequest(e.to_string()),
                    CreateGameError::SlugTaken(slug) => {
                        ServiceError::Conflict(format!("Slug '{}' is already taken", slug))
                    }
                    CreateGameError::RepositoryError => {
                        ServiceError::Internal("Failed to create game".to_string())
                    }
                })?;
            Ok(Json(json!(JsonGame::from(game))))
        }
    }
}

pub async fn update(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<i64>,
    WithRejection(Json(body), _): ApiJson<Value>,
) -> Result<Json<JsonGame>, ServiceError> {
    let game = state
        .app
        .game_update_use_case
        .update_game(GameId(id), parse_input(body)?)
        .await
        .map_err(|e| match e {
            UpdateGameError::Invalid(e) => ServiceError::BadRequest(e.to_string()),
            UpdateGameError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
            UpdateGameError::SlugTaken => {
                ServiceError::Conflict("Slug is already taken".to_string())
            }
            UpdateGameError::RepositoryError => {
                ServiceError::Internal("Failed to update game".to_string())
            }
        })?;
    Ok(Json(game.into()))
}

pub async fn delete(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<i64>,
) -> Result<Json<Value>, ServiceError> {
    state
        .app
        .game_delete_use_case
        .delete_game(GameId(id))
        .await
        .map_err(|e| match e {
            DeleteGameError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
            DeleteGameError::RepositoryError => {
                ServiceError::Internal("Failed to delete game".to_string())
            }
        })?;
    Ok(Json(json!({ "success": true })))
}

/// `{"ids": [..]}` deletes those games; an empty body or an object without
/// `ids` deletes all.
pub async fn delete_bulk(
    _admin: AdminAuth,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ServiceError> {
    let invalid = |msg: &str| ServiceError::BadRequest(format!("Invalid body: {}", msg));
    let selection = if body.iter().all(u8::is_ascii_whitespace) {
        GameSelection::All
    } else {
        let body = serde_json::from_slice::<Value>(&body).map_err(|e| invalid(&e.to_string()))?;
        let Value::Object(mut fields) = body else {
            return Err(invalid("expected an object"));
        };
        match fields.remove("ids") {
            None => GameSelection::All,
            Some(ids) => {
                let ids = serde_json::from_value::<Vec<i64>>(ids)
                    .map_err(|e| invalid(&format!("ids: {}", e)))?;
                GameSelection::Ids(ids.into_iter().map(GameId).collect())
            }
        }
    };
    let deleted = state
        .app
        .game_delete_use_case
        .delete_games(selection)
        .await
        .map_err(|_| ServiceError::Internal("Failed to delete games".to_string()))?;
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

pub async fn record_play(
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<i64>,
) -> Result<Json<Value>, ServiceError> {
    let play_count = state
        .app
        .game_record_play_use_case
        .record_play(GameId(id))
        .await
        .map_err(|e| match e {
            RecordPlayError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
            RecordPlayError::RepositoryError => {
                ServiceError::Internal("Failed to record play".to_string())
            }
        })?;
    Ok(Json(json!({ "playCount": play_count })))
}

#[derive(Deserialize)]
pub struct PlayCountersBody {
    mode: Option<String>,
}

pub async fn set_play_counters(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<PlayCountersBody>,
) -> Result<Json<Value>, ServiceError> {
    let mode = body
        .mode
        .as_deref()
        .and_then(|m| m.parse::<PlayCounterMode>().ok())
        .ok_or_else(|| ServiceError::BadRequest("Invalid mode".to_string()))?;
    let updated = state
        .app
        .game_play_counters_use_case
        .set_play_counters(mode)
        .await
        .map_err(|PlayCountersError::RepositoryError| {
            ServiceError::Internal("Failed to update play counters".to_string())
        })?;
    Ok(Json(json!({ "updated": updated })))
}
