use std::sync::Arc;

use crate::{
    domain::{
        comment::{CommentRepository, RustrictContentPolicy},
        game::GameRepository,
        rating::RatingRepository,
    },
    ports::{catalog::CatalogSource, fetch::ResourceFetchPort, storage::AssetStoragePort},
    services::database_catalog::DatabaseCatalogSource,
    workflow::{
        assets::{
            proxy::{ProxyResourceUseCase, ProxyResourceUseCaseImpl},
            upload::{UploadAssetUseCase, UploadAssetUseCaseImpl},
        },
        catalog::{
            browse::{BrowseCatalogUseCase, BrowseCatalogUseCaseImpl},
            record_view::{RecordViewUseCase, RecordViewUseCaseImpl},
        },
        comments::{
            list::{ListCommentsUseCase, ListCommentsUseCaseImpl},
            moderate::{ModerateCommentUseCase, ModerateCommentUseCaseImpl},
            post::{PostCommentUseCase, PostCommentUseCaseImpl},
        },
        games::{
            bulk_create::{BulkCreateGamesUseCase, BulkCreateGamesUseCaseImpl},
            create::{CreateGameUseCase, CreateGameUseCaseImpl},
            delete::{DeleteGameUseCase, DeleteGameUseCaseImpl},
            get::{GetGameUseCase, GetGameUseCaseImpl},
            list::{ListGamesUseCase, ListGamesUseCaseImpl},
            play::{RecordPlayUseCase, RecordPlayUseCaseImpl},
            play_counters::{PlayCountersUseCase, PlayCountersUseCaseImpl},
            update::{UpdateGameUseCase, UpdateGameUseCaseImpl},
        },
        ratings::{
            rate::{RateGameUseCase, RateGameUseCaseImpl},
            summary::{RatingSummaryUseCase, RatingSummaryUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod services;
pub mod workflow;

#[cfg(test)]
mod testing;

pub struct Application {
    pub game_list_use_case: Box<dyn ListGamesUseCase + Send + Sync + 'static>,
    pub game_get_use_case: Box<dyn GetGameUseCase + Send + Sync + 'static>,
    pub game_create_use_case: Box<dyn CreateGameUseCase + Send + Sync + 'static>,
    pub game_bulk_create_use_case: Box<dyn BulkCreateGamesUseCase + Send + Sync + 'static>,
    pub game_update_use_case: Box<dyn UpdateGameUseCase + Send + Sync + 'static>,
    pub game_delete_use_case: Box<dyn DeleteGameUseCase + Send + Sync + 'static>,
    pub game_record_play_use_case: Box<dyn RecordPlayUseCase + Send + Sync + 'static>,
    pub game_play_counters_use_case: Box<dyn PlayCountersUseCase + Send + Sync + 'static>,

    pub comment_post_use_case: Box<dyn PostCommentUseCase + Send + Sync + 'static>,
    pub comment_list_use_case: Box<dyn ListCommentsUseCase + Send + Sync + 'static>,
    pub comment_moderate_use_case: Box<dyn ModerateCommentUseCase + Send + Sync + 'static>,

    pub rating_rate_use_case: Box<dyn RateGameUseCase + Send + Sync + 'static>,
    pub rating_summary_use_case: Box<dyn RatingSummaryUseCase + Send + Sync + 'static>,

    pub asset_upload_use_case: Box<dyn UploadAssetUseCase + Send + Sync + 'static>,
    pub asset_proxy_use_case: Box<dyn ProxyResourceUseCase + Send + Sync + 'static>,

    pub catalog_browse_use_case: Box<dyn BrowseCatalogUseCase + Send + Sync + 'static>,
    pub catalog_record_view_use_case: Box<dyn RecordViewUseCase + Send + Sync + 'static>,
}

/// Wires every use case. Without an explicit catalog source the public feeds
/// are read from the game repository.
pub fn build_application<
    G: GameRepository + Send + Sync + 'static,
    C: CommentRepository + Send + Sync + 'static,
    R: RatingRepository + Send + Sync + 'static,
    S: AssetStoragePort + Send + Sync + 'static,
    F: ResourceFetchPort + Send + Sync + 'static,
>(
    game_repository: Arc<G>,
    comment_repository: Arc<C>,
    rating_repository: Arc<R>,
    asset_storage: Arc<S>,
    resource_fetcher: Arc<F>,
    catalog_source: Option<Arc<dyn CatalogSource + Send + Sync + 'static>>,
) -> Application {
    let content_policy = Arc::new(RustrictContentPolicy::new());
    let catalog_source = catalog_source.unwrap_or_else(|| {
        Arc::new(DatabaseCatalogSource::new(game_repository.clone()))
            as Arc<dyn CatalogSource + Send + Sync + 'static>
    });

    Application {
        game_list_use_case: Box::new(ListGamesUseCaseImpl::new(game_repository.clone())),
        game_get_use_case: Box::new(GetGameUseCaseImpl::new(game_repository.clone())),
        game_create_use_case: Box::new(CreateGameUseCaseImpl::new(game_repository.clone())),
        game_bulk_create_use_case: Box::new(BulkCreateGamesUseCaseImpl::new(
            game_repository.clone(),
        )),
        game_update_use_case: Box::new(UpdateGameUseCaseImpl::new(game_repository.clone())),
        game_delete_use_case: Box::new(DeleteGameUseCaseImpl::new(game_repository.clone())),
        game_record_play_use_case: Box::new(RecordPlayUseCaseImpl::new(game_repository.clone())),
        game_play_counters_use_case: Box::new(PlayCountersUseCaseImpl::new(
            game_repository.clone(),
        )),

        comment_post_use_case: Box::new(PostCommentUseCaseImpl::new(
            game_repository.clone(),
            comment_repository.clone(),
            content_policy,
        )),
        comment_list_use_case: Box::new(ListCommentsUseCaseImpl::new(comment_repository.clone())),
        comment_moderate_use_case: Box::new(ModerateCommentUseCaseImpl::new(comment_repository)),

        rating_rate_use_case: Box::new(RateGameUseCaseImpl::new(
            game_repository,
            rating_repository.clone(),
        )),
        rating_summary_use_case: Box::new(RatingSummaryUseCaseImpl::new(rating_repository)),

        asset_upload_use_case: Box::new(UploadAssetUseCaseImpl::new(asset_storage)),
        asset_proxy_use_case: Box::new(ProxyResourceUseCaseImpl::new(resource_fetcher)),

        catalog_browse_use_case: Box::new(BrowseCatalogUseCaseImpl::new(catalog_source.clone())),
        catalog_record_view_use_case: Box::new(RecordViewUseCaseImpl::new(catalog_source)),
    }
}
