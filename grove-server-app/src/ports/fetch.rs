use crate::domain::asset::RemoteResource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote answered with a non-success status.
    Status(u16),
    Transport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(status) => write!(f, "Remote returned status {}", status),
            FetchError::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}

#[async_trait::async_trait]
pub trait ResourceFetchPort {
    async fn fetch(&self, url: &str) -> Result<RemoteResource, FetchError>;
}
