use std::sync::Arc;

use crate::{
    domain::asset::{AssetKind, sanitize_file_name},
    ports::storage::{AssetStoragePort, StoreAssetError},
};

#[async_trait::async_trait]
pub trait UploadAssetUseCase {
    /// Stores the file and returns its public URL path.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadAssetError>;
}

#[derive(Debug, PartialEq)]
pub enum UploadAssetError {
    InvalidFileName,
    StorageError,
}

pub struct UploadAssetUseCaseImpl<S: AssetStoragePort> {
    storage: Arc<S>,
}

impl<S: AssetStoragePort> UploadAssetUseCaseImpl<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }
}

#[async_trait::async_trait]
impl<S: AssetStoragePort + Send + Sync + 'static> UploadAssetUseCase for UploadAssetUseCaseImpl<S> {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadAssetError> {
        let file_name = sanitize_file_name(file_name);
        if file_name.chars().all(|c| c == '.' || c == '-') {
            return Err(UploadAssetError::InvalidFileName);
        }
        let kind = AssetKind::from_file_name(&file_name);
        let size = bytes.len();
        match self.storage.store(kind, &file_name, bytes).await {
            Ok(url) => {
                log::info!("Uploaded {} ({} bytes)", url, size);
                Ok(url)
            }
            Err(StoreAssetError::Io(e)) => {
                log::error!("Error storing upload {}: {}", file_name, e);
                Err(UploadAssetError::StorageError)
            }
        }
    }
}
