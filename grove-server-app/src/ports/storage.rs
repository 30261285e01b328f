use crate::domain::asset::AssetKind;

#[derive(Debug, Clone)]
pub enum StoreAssetError {
    Io(String),
}

impl std::fmt::Display for StoreAssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreAssetError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

#[async_trait::async_trait]
pub trait AssetStoragePort {
    /// Writes the file, replacing any existing file of the same name, and
    /// returns its public path (`/<directory>/<file_name>`).
    async fn store(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreAssetError>;
}
