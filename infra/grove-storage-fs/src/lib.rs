use std::path::{Path, PathBuf};

use grove_server_app::{
    domain::asset::AssetKind,
    ports::storage::{AssetStoragePort, StoreAssetError},
};

pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Publishes uploads under `<public_dir>/images` and `<public_dir>/roms`.
pub struct FsAssetStorage {
    public_dir: PathBuf,
}

impl FsAssetStorage {
    pub fn new() -> Self {
        let public_dir =
            std::env::var("GROVE_PUBLIC_DIR").unwrap_or_else(|_| DEFAULT_PUBLIC_DIR.to_string());
        Self::with_root(public_dir)
    }

    pub fn with_root(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }
}

#[async_trait::async_trait]
impl AssetStoragePort for FsAssetStorage {
    async fn store(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreAssetError> {
        let dir = self.public_dir.join(kind.directory());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreAssetError::Io(e.to_string()))?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreAssetError::Io(e.to_string()))?;
        log::debug!("Wrote {}", path.display());
        Ok(format!("/{}/{}", kind.directory(), file_name))
    }
}
