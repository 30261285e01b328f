use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use axum_extra::extract::WithRejection;
use grove_server_app::{
    domain::GameId,
    workflow::ratings::{rate::RateGameError, summary::RatingSummaryError},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, ServiceError,
    http::{ApiQuery, id_from_value},
};

pub async fn rate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let invalid = || ServiceError::BadRequest("Invalid data".to_string());
    let Ok(Json(body)) = body else {
        return Err(invalid());
    };
    let game_id = id_from_value(body.get("gameId")).ok_or_else(invalid)?;
    let value = id_from_value(body.get("value"))
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(invalid)?;
    let summary = state
        .app
        .rating_rate_use_case
        .rate_game(GameId(game_id), value)
        .await
        .map_err(|e| match e {
            RateGameError::InvalidValue => invalid(),
            RateGameError::GameNotFound => ServiceError::NotFound("Game not found".to_string()),
            RateGameError::RepositoryError => {
                ServiceError::Internal("Failed to save rating".to_string())
            }
        })?;
    Ok(Json(json!({
        "success": true,
        "average": summary.average,
        "count": summary.count,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryParams {
    game_id: Option<String>,
}

pub async fn summary(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<SummaryParams>,
) -> Result<Json<Value>, ServiceError> {
    let game_id = params
        .game_id
        .and_then(|id| id.trim().parse::<i64>().ok())
        .ok_or_else(|| ServiceError::BadRequest("Missing gameId".to_string()))?;
    let summary = state
        .app
        .rating_summary_use_case
        .get_summary(GameId(game_id))
        .await
        .map_err(|RatingSummaryError::RepositoryError| {
            ServiceError::Internal("Failed to fetch ratings".to_string())
        })?;
    Ok(Json(json!({
        "average": summary.average,
        "count": summary.count,
    })))
}
