use std::path::Path;

use grove_core::import::{ImportReport, ImportedGame, batches};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server answered {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct CountResponse {
    count: usize,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Back-office client for the Grove HTTP API.
#[derive(Clone)]
pub struct GroveClient {
    server_url: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl GroveClient {
    pub fn new(server_url: impl Into<String>, token: Option<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self {
            server_url,
            token: token.filter(|t| !t.is_empty()),
            http_client: reqwest::Client::new(),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, HttpError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(HttpError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Submits one import batch and returns how many games were created.
    pub async fn create_games(&self, games: &[ImportedGame]) -> Result<usize, HttpError> {
        let resp = self
            .authorized(
                self.http_client
                    .post(format!("{}/api/games", self.server_url))
                    .json(games),
            )
            .send()
            .await?;
        let body: CountResponse = Self::check(resp).await?.json().await?;
        Ok(body.count)
    }

    /// Uploads a local file and returns its public URL.
    pub async fn upload_file(&self, path: &Path) -> Result<String, HttpError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .authorized(
                self.http_client
                    .post(format!("{}/api/upload", self.server_url))
                    .multipart(form),
            )
            .send()
            .await?;
        let body: UploadResponse = Self::check(resp).await?.json().await?;
        Ok(body.url)
    }

    /// Downloads a remote listing, e.g. an XML feed.
    pub async fn fetch_text(&self, url: &str) -> Result<String, HttpError> {
        let resp = self.http_client.get(url).send().await?;
        Ok(Self::check(resp).await?.text().await?)
    }
}

/// Destination of import batches.
#[async_trait::async_trait]
pub trait BatchSink {
    async fn submit(&self, batch: &[ImportedGame]) -> Result<usize, String>;
}

#[async_trait::async_trait]
impl BatchSink for GroveClient {
    async fn submit(&self, batch: &[ImportedGame]) -> Result<usize, String> {
        self.create_games(batch).await.map_err(|e| e.to_string())
    }
}

/// Sends the games batch by batch. A failed batch is recorded and skipped.
/// `on_batch` receives the batch number (from 1), the batch count and the
/// batch outcome.
pub async fn run_import<S: BatchSink + Sync>(
    sink: &S,
    games: &[ImportedGame],
    mut on_batch: impl FnMut(usize, usize, &Result<usize, String>),
) -> ImportReport {
    let mut report = ImportReport::new(games.len());
    let batch_count = batches(games).len();
    for (index, batch) in batches(games).enumerate() {
        let outcome = sink.submit(batch).await;
        on_batch(index + 1, batch_count, &outcome);
        match outcome {
            Ok(created) => report.record_success(created),
            Err(e) => report.record_failure(e),
        }
    }
    report
}
