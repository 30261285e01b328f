use std::{path::Path, sync::Arc};

use axum::{
    Router,
    extract::rejection::{JsonRejection, MultipartRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use grove_server_app::Application;
use log::info;
use tower_http::services::ServeDir;

mod auth;
mod http;

pub use auth::AdminAuth;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
    /// `None` leaves the admin endpoints open.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(app: Arc<Application>, admin_token: Option<String>) -> Self {
        Self {
            app,
            admin_token: admin_token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }
}

/// JSON API under `/api` plus static serving of uploaded images and ROMs.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .nest("/api", http::routes())
        .nest_service("/images", ServeDir::new(public_dir.join("images")))
        .nest_service("/roms", ServeDir::new(public_dir.join("roms")))
        .with_state(state)
}

pub async fn run(
    app: Arc<Application>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let port = std::env::var("GROVE_HTTP_PORT")
        .expect("GROVE_HTTP_PORT must be set")
        .parse::<u16>()
        .expect("GROVE_HTTP_PORT must be a valid u16");
    let host = std::env::var("GROVE_HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let public_dir = std::env::var("GROVE_PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());
    let admin_token = std::env::var("GROVE_ADMIN_TOKEN").ok();
    if admin_token.as_deref().is_none_or(str::is_empty) {
        log::warn!("GROVE_ADMIN_TOKEN is not set, admin endpoints are open");
    }

    let state = AppState::new(app, admin_token);
    let router = router(state, Path::new(&public_dir));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .expect("Failed to bind HTTP listener");

    info!("HTTP API listening on {}:{}", host, port);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .expect("HTTP server failed");

    info!("HTTP API shut down gracefully");
}

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    Conflict(String),
    /// Relays a failing upstream status.
    Upstream(u16, String),
    /// A request axum could not extract (bad JSON, path or query).
    Rejected(StatusCode, String),
    Internal(String),
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ServiceError {
                fn from(rejection: $rejection) -> Self {
                    ServiceError::Rejected(rejection.status(), rejection.body_text())
                }
            }
        )*
    };
}

impl_from_rejection!(JsonRejection, QueryRejection, PathRejection, MultipartRejection);

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::Upstream(status, msg) => write!(f, "Upstream {}: {}", status, msg),
            ServiceError::Rejected(status, msg) => write!(f, "Rejected {}: {}", status, msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::Upstream(status, msg) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                msg,
            ),
            ServiceError::Rejected(status, msg) => (status, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}
