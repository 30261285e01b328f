use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use axum_extra::extract::WithRejection;
use grove_server_app::{
    domain::{CommentId, GameId, comment::Comment, comment::CommentWithGame},
    workflow::comments::{
        list::ListCommentsError, moderate::ModerateCommentError, post::CommentSubmission,
        post::PostCommentError,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    AdminAuth, AppState, ServiceError,
    auth::is_admin,
    http::{ApiJson, ApiQuery, format_timestamp, id_from_value},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonComment {
    id: i64,
    game_id: i64,
    content: String,
    author: String,
    approved: bool,
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    game: Option<JsonCommentGame>,
}

#[derive(Serialize)]
pub struct JsonCommentGame {
    title: String,
}

impl JsonComment {
    fn new(comment: Comment, game_title: Option<String>) -> Self {
        JsonComment {
            id: comment.id.0,
            game_id: comment.game_id.0,
            content: comment.content,
            author: comment.author,
            approved: comment.approved,
            created_at: format_timestamp(comment.created_at),
            game: game_title.map(|title| JsonCommentGame { title }),
        }
    }
}

impl From<CommentWithGame> for JsonComment {
    fn from(item: CommentWithGame) -> Self {
        JsonComment::new(item.comment, Some(item.game_title))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsParams {
    game_id: Option<String>,
    admin: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(Query(params), _): ApiQuery<ListCommentsParams>,
) -> Result<Json<Vec<JsonComment>>, ServiceError> {
    let include_unapproved = params.admin.as_deref() == Some("true");
    if include_unapproved && !is_admin(&headers, &state) {
        return Err(ServiceError::Unauthorized("Unauthorized".to_string()));
    }
    let game_id = match params.game_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(GameId(raw.parse().map_err(|_| {
            ServiceError::BadRequest("Invalid gameId".to_string())
        })?)),
    };
    let comments = state
        .app
        .comment_list_use_case
        .list_comments(game_id, include_unapproved)
        .await
        .map_err(|ListCommentsError::RepositoryError| {
            ServiceError::Internal("Failed to fetch comments".to_string())
        })?;
    Ok(Json(comments.into_iter().map(JsonComment::from).collect()))
}

pub async fn post(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<Value>,
) -> Result<Json<JsonComment>, ServiceError> {
    let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
    let submission = CommentSubmission {
        game_id: id_from_value(body.get("gameId")).map(GameId),
        content: text("content"),
        author: text("author"),
    };
    let comment = state
        .app
        .comment_post_use_case
        .post_comment(submission)
        .await
        .map_err(|e| match e {
            PostCommentError::MissingFields => {
                ServiceError::BadRequest("Missing fields".to_string())
            }
            PostCommentError::Invalid(msg) => ServiceError::BadRequest(msg),
            PostCommentError::GameNotFound => {
                ServiceError::NotFound("Game not found".to_string())
            }
            PostCommentError::RepositoryError => {
                ServiceError::Internal("Failed to post comment".to_string())
            }
        })?;
    Ok(Json(JsonComment::new(comment, None)))
}

fn moderation_error(e: ModerateCommentError) -> ServiceError {
    match e {
        ModerateCommentError::CommentNotFound => {
            ServiceError::NotFound("Comment not found".to_string())
        }
        ModerateCommentError::RepositoryError => {
            ServiceError::Internal("Failed to update comment".to_string())
        }
    }
}

pub async fn moderate(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(Json(body), _): ApiJson<Value>,
) -> Result<Json<Value>, ServiceError> {
    let id = id_from_value(body.get("id"))
        .ok_or_else(|| ServiceError::BadRequest("Missing ID".to_string()))?;
    let approved = body
        .get("approved")
        .and_then(Value::as_bool)
        .ok_or_else(|| ServiceError::BadRequest("Missing approved flag".to_string()))?;
    state
        .app
        .comment_moderate_use_case
        .set_approved(CommentId(id), approved)
        .await
        .map_err(moderation_error)?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct DeleteCommentParams {
    id: Option<String>,
}

pub async fn delete(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<DeleteCommentParams>,
) -> Result<Json<Value>, ServiceError> {
    let id = params
        .id
        .and_then(|id| id.trim().parse::<i64>().ok())
        .ok_or_else(|| ServiceError::BadRequest("Missing ID".to_string()))?;
    state
        .app
        .comment_moderate_use_case
        .delete_comment(CommentId(id))
        .await
        .map_err(moderation_error)?;
    Ok(Json(json!({ "success": true })))
}
