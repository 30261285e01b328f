use std::sync::Arc;

use crate::ports::catalog::{CatalogError, CatalogSource};

#[async_trait::async_trait]
pub trait RecordViewUseCase {
    /// Forwards a play to the catalog backend and returns its acknowledgement.
    async fn record_view(&self, id: i64) -> Result<serde_json::Value, RecordViewError>;
}

#[derive(Debug, PartialEq)]
pub enum RecordViewError {
    GameNotFound,
    Upstream(u16),
    SourceUnavailable,
}

pub struct RecordViewUseCaseImpl<C: CatalogSource + ?Sized> {
    catalog_source: Arc<C>,
}

impl<C: CatalogSource + ?Sized> RecordViewUseCaseImpl<C> {
    pub fn new(catalog_source: Arc<C>) -> Self {
        Self { catalog_source }
    }
}

#[async_trait::async_trait]
impl<C: CatalogSource + Send + Sync + ?Sized + 'static> RecordViewUseCase
    for RecordViewUseCaseImpl<C>
{
    async fn record_view(&self, id: i64) -> Result<serde_json::Value, RecordViewError> {
        match self.catalog_source.record_play(id).await {
            Ok(ack) => Ok(ack),
            Err(CatalogError::NotFound) => Err(RecordViewError::GameNotFound),
            Err(CatalogError::Upstream(status)) => {
                log::warn!("Recording view for {} rejected with {}", id, status);
                Err(RecordViewError::Upstream(status))
            }
            Err(CatalogError::Unavailable(e)) => {
                log::error!("Error recording view for {}: {}", id, e);
                Err(RecordViewError::SourceUnavailable)
            }
        }
    }
}
