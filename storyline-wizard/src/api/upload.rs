//! Interview upload endpoints

use axum::{
    extract::{Multipart, State},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;

use crate::api::workflow::update_workflow;
use crate::models::{FileKind, IngestedFile};
use crate::services::{decode_upload, preview, samples, validate_file_size};
use crate::session::SessionId;
use crate::{ApiError, ApiResult, AppState};

/// Upload result shown under the file picker
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub name: String,
    pub kind: FileKind,
    pub size_bytes: usize,
    pub chars: usize,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

async fn store_interview(state: &AppState, id: uuid::Uuid, file: IngestedFile) -> ApiResult<UploadResponse> {
    let response = UploadResponse {
        name: file.name.clone(),
        kind: file.kind,
        size_bytes: file.size_bytes,
        chars: file.text.chars().count(),
        preview: preview(&file.text, state.config.upload.preview_chars),
        notice: file.notice.clone(),
    };
    let notice = file.notice.clone();
    update_workflow(state, id, move |w| {
        w.set_interview(file);
        if let Some(notice) = notice {
            w.warn(notice);
        }
    })
    .await?;
    Ok(response)
}

/// POST /api/upload
///
/// Multipart form with a single `file` field.
pub async fn upload_interview(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        validate_file_size(bytes.len(), state.config.upload.max_size_mb)?;
        let file = decode_upload(&name, &bytes)?;
        return Ok(Json(store_interview(&state, id, file).await?));
    }

    Err(ApiError::BadRequest("Missing `file` field".to_string()))
}

/// POST /api/upload/sample
pub async fn use_sample_interview(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> ApiResult<Json<UploadResponse>> {
    Ok(Json(store_interview(&state, id, samples::sample_interview()).await?))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/api/upload", post(upload_interview))
        .route("/api/upload/sample", post(use_sample_interview))
}
