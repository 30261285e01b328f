use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query},
    routing::{delete, get, post},
};
use axum_extra::extract::WithRejection;

use crate::{AppState, ServiceError};

mod assets;
mod catalog;
mod comments;
mod games;
mod ratings;

/// Extractors whose rejections are reported as `{"error": ..}` bodies.
type ApiJson<T> = WithRejection<Json<T>, ServiceError>;
type ApiPath<T> = WithRejection<Path<T>, ServiceError>;
type ApiQuery<T> = WithRejection<Query<T>, ServiceError>;

const UPLOAD_BODY_LIMIT: usize = 512 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::list).post(games::create))
        .route("/games/bulk", delete(games::delete_bulk))
        .route("/games/plays", post(games::set_play_counters))
        .route("/games/slug/{slug}", get(games::get_by_slug))
        .route(
            "/games/{id}",
            get(games::get_by_id).put(games::update).delete(games::delete),
        )
        .route("/games/{id}/play", post(games::record_play))
        .route(
            "/comments",
            get(comments::list)
                .post(comments::post)
                .put(comments::moderate)
                .delete(comments::delete),
        )
        .route("/ratings", get(ratings::summary).post(ratings::rate))
        .route(
            "/upload",
            post(assets::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/proxy-rom", get(assets::proxy_rom))
        .route("/catalog/latest", get(catalog::latest))
        .route("/catalog/popular", get(catalog::popular))
        .route("/catalog/home", get(catalog::home))
        .route("/catalog/game/{slug}", get(catalog::game_by_slug))
        .route("/view", post(catalog::record_view))
}

/// Accepts ids sent either as JSON numbers or numeric strings.
fn id_from_value(value: Option<&serde_json::Value>) -> Option<i64> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn format_timestamp(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
