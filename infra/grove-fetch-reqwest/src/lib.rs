use std::time::Duration;

use grove_server_app::{
    domain::asset::RemoteResource,
    ports::fetch::{FetchError, ResourceFetchPort},
};

pub struct ReqwestResourceFetcher {
    client: reqwest::Client,
}

impl ReqwestResourceFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }
}

#[async_trait::async_trait]
impl ResourceFetchPort for ReqwestResourceFetcher {
    async fn fetch(&self, url: &str) -> Result<RemoteResource, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        log::debug!("Fetched {} ({} bytes)", url, bytes.len());
        Ok(RemoteResource {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
