use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use grove_server_app::workflow::assets::{
    proxy::{DEFAULT_CONTENT_TYPE, ProxyResourceError},
    upload::UploadAssetError,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AdminAuth, AppState, ServiceError, http::ApiQuery};

pub async fn upload(
    _admin: AdminAuth,
    State(state): State<AppState>,
    WithRejection(mut multipart, _): WithRejection<Multipart, ServiceError>,
) -> Result<Json<Value>, ServiceError> {
    let no_file = || ServiceError::BadRequest("No file uploaded".to_string());
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::BadRequest(format!("Failed to read file: {}", e)))?;
        file = Some((file_name, bytes));
        break;
    }
    let (file_name, bytes) = file.ok_or_else(no_file)?;

    let url = state
        .app
        .asset_upload_use_case
        .upload(&file_name, bytes.to_vec())
        .await
        .map_err(|e| match e {
            UploadAssetError::InvalidFileName => {
                ServiceError::BadRequest("Invalid file name".to_string())
            }
            UploadAssetError::StorageError => {
                ServiceError::Internal("Failed to store file".to_string())
            }
        })?;
    Ok(Json(json!({ "success": true, "url": url })))
}

#[derive(Deserialize)]
pub struct ProxyParams {
    url: Option<String>,
}

pub async fn proxy_rom(
    State(state): State<AppState>,
    WithRejection(Query(params), _): ApiQuery<ProxyParams>,
) -> Result<Response, ServiceError> {
    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServiceError::BadRequest("Missing rom url".to_string()))?;
    let resource = state
        .app
        .asset_proxy_use_case
        .fetch(&url)
        .await
        .map_err(|e| match e {
            ProxyResourceError::InvalidUrl => ServiceError::BadRequest("Invalid rom url".to_string()),
            ProxyResourceError::Upstream(status) => {
                ServiceError::Upstream(status, "Failed to fetch ROM".to_string())
            }
            ProxyResourceError::Unreachable => {
                ServiceError::Internal("Internal Server Error".to_string())
            }
        })?;
    let content_type = resource
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
        resource.bytes,
    )
        .into_response())
}
