use std::sync::Arc;

use grove_fetch_reqwest::ReqwestResourceFetcher;
use grove_persistence_sea_orm::{
    comments::CommentRepositoryImpl, games::GameRepositoryImpl, ratings::RatingRepositoryImpl,
};
use grove_server_app::{build_application, ports::catalog::CatalogSource};
use grove_storage_fs::FsAssetStorage;
use grove_wordpress::WordPressCatalogSource;
use log::info;

mod logs;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping");
}

/// `GROVE_CATALOG_SOURCE=wordpress` serves the public feeds from WordPress;
/// anything else keeps them on the local database.
fn catalog_source() -> Option<Arc<dyn CatalogSource + Send + Sync + 'static>> {
    let source = std::env::var("GROVE_CATALOG_SOURCE").unwrap_or_else(|_| "database".to_string());
    match source.trim().to_lowercase().as_str() {
        "wordpress" => {
            info!("Public catalog served from WordPress");
            Some(Arc::new(WordPressCatalogSource::new()))
        }
        "database" => None,
        other => {
            log::warn!("Unknown GROVE_CATALOG_SOURCE '{}', using the database", other);
            None
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    logs::init_logger();

    let game_repo = Arc::new(GameRepositoryImpl::new().await);
    let comment_repo = Arc::new(CommentRepositoryImpl::new().await);
    let rating_repo = Arc::new(RatingRepositoryImpl::new().await);
    let asset_storage = Arc::new(FsAssetStorage::new());
    let resource_fetcher = Arc::new(ReqwestResourceFetcher::new());

    let app = Arc::new(build_application(
        game_repo,
        comment_repo,
        rating_repo,
        asset_storage,
        resource_fetcher,
        catalog_source(),
    ));

    info!("Starting Grove server");
    grove_server_api::run(app, shutdown_signal()).await;
}
