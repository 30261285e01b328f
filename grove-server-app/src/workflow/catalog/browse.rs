use std::sync::Arc;

use crate::ports::catalog::{CatalogError, CatalogGame, CatalogSource};

pub const DEFAULT_LATEST_LIMIT: usize = 100;
pub const DEFAULT_POPULAR_LIMIT: usize = 5;
pub const HOME_SLIDER_SIZE: usize = 20;
pub const HOME_GRID_SIZE: usize = 40;

#[derive(Clone, Debug, PartialEq)]
pub struct HomeFeed {
    pub slider: Vec<CatalogGame>,
    pub grid: Vec<CatalogGame>,
}

#[async_trait::async_trait]
pub trait BrowseCatalogUseCase {
    async fn latest(&self, limit: usize) -> Result<Vec<CatalogGame>, BrowseCatalogError>;
    async fn popular(&self, limit: usize) -> Result<Vec<CatalogGame>, BrowseCatalogError>;
    async fn home(&self) -> Result<HomeFeed, BrowseCatalogError>;
    async fn game_by_slug(&self, slug: &str) -> Result<CatalogGame, BrowseCatalogError>;
}

#[derive(Debug, PartialEq)]
pub enum BrowseCatalogError {
    GameNotFound,
    SourceUnavailable,
}

impl From<CatalogError> for BrowseCatalogError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound => BrowseCatalogError::GameNotFound,
            e => {
                log::error!("Catalog source failed: {}", e);
                BrowseCatalogError::SourceUnavailable
            }
        }
    }
}

pub struct BrowseCatalogUseCaseImpl<C: CatalogSource + ?Sized> {
    catalog_source: Arc<C>,
}

impl<C: CatalogSource + ?Sized> BrowseCatalogUseCaseImpl<C> {
    pub fn new(catalog_source: Arc<C>) -> Self {
        Self { catalog_source }
    }
}

#[async_trait::async_trait]
impl<C: CatalogSource + Send + Sync + ?Sized + 'static> BrowseCatalogUseCase
    for BrowseCatalogUseCaseImpl<C>
{
    async fn latest(&self, limit: usize) -> Result<Vec<CatalogGame>, BrowseCatalogError> {
        Ok(self.catalog_source.latest(limit).await?)
    }

    async fn popular(&self, limit: usize) -> Result<Vec<CatalogGame>, BrowseCatalogError> {
        Ok(self.catalog_source.popular(limit).await?)
    }

    async fn home(&self) -> Result<HomeFeed, BrowseCatalogError> {
        let (slider, grid) = futures::join!(
            self.catalog_source.latest(HOME_SLIDER_SIZE),
            self.catalog_source.popular(HOME_GRID_SIZE)
        );
        let slider = slider?;
        let mut grid = grid?;
        if grid.is_empty() {
            grid = self
                .catalog_source
                .latest(HOME_SLIDER_SIZE + HOME_GRID_SIZE)
                .await?
                .into_iter()
                .skip(HOME_SLIDER_SIZE)
                .collect();
        }
        Ok(HomeFeed { slider, grid })
    }

    async fn game_by_slug(&self, slug: &str) -> Result<CatalogGame, BrowseCatalogError> {
        self.catalog_source
            .by_slug(slug)
            .await?
            .ok_or(BrowseCatalogError::GameNotFound)
    }
}
