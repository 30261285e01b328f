use std::sync::Arc;

use crate::{
    domain::asset::RemoteResource,
    ports::fetch::{FetchError, ResourceFetchPort},
};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[async_trait::async_trait]
pub trait ProxyResourceUseCase {
    async fn fetch(&self, url: &str) -> Result<RemoteResource, ProxyResourceError>;
}

#[derive(Debug, PartialEq)]
pub enum ProxyResourceError {
    InvalidUrl,
    /// The remote answered with this non-success status.
    Upstream(u16),
    Unreachable,
}

pub struct ProxyResourceUseCaseImpl<F: ResourceFetchPort> {
    fetcher: Arc<F>,
}

impl<F: ResourceFetchPort> ProxyResourceUseCaseImpl<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl<F: ResourceFetchPort + Send + Sync + 'static> ProxyResourceUseCase
    for ProxyResourceUseCaseImpl<F>
{
    async fn fetch(&self, url: &str) -> Result<RemoteResource, ProxyResourceError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ProxyResourceError::InvalidUrl);
        }
        match self.fetcher.fetch(url).await {
            Ok(resource) => Ok(RemoteResource {
                content_type: resource
                    .content_type
                    .or_else(|| Some(DEFAULT_CONTENT_TYPE.to_string())),
                bytes: resource.bytes,
            }),
            Err(FetchError::Status(status)) => {
                log::warn!("Proxy fetch of {} returned {}", url, status);
                Err(ProxyResourceError::Upstream(status))
            }
            Err(FetchError::Transport(e)) => {
                log::error!("Proxy fetch of {} failed: {}", url, e);
                Err(ProxyResourceError::Unreachable)
            }
        }
    }
}
