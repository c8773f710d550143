//! WordPress publish endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::api::workflow::{load_workflow, require_stage, update_workflow};
use crate::models::{PublishRequest, PublishResult, Stage};
use crate::services::PublishSettings;
use crate::session::SessionId;
use crate::{ApiError, ApiResult, AppState};

/// Overrides for the post; everything defaults to the draft and configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublishBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub categories: Vec<u64>,
    pub tags: Vec<u64>,
}

/// GET /api/publish/settings
pub async fn settings(State(state): State<AppState>) -> Json<PublishSettings> {
    Json(state.publisher.settings())
}

/// POST /api/publish
///
/// A WordPress failure is reported as 502; the workflow is left untouched so
/// the user can fix settings and retry.
pub async fn publish(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(body): Json<PublishBody>,
) -> ApiResult<Json<PublishResult>> {
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::Publish)?;
    let draft = workflow
        .draft
        .ok_or_else(|| ApiError::Conflict("Write a draft first".to_string()))?;

    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let request = PublishRequest {
        title: non_empty(body.title).unwrap_or(draft.title),
        content: non_empty(body.content).unwrap_or(draft.content),
        status: body.status.unwrap_or_default(),
        categories: body.categories,
        tags: body.tags,
    };

    let result = match state.publisher.publish(request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(stage = "publish", error = %e, "Publish failed");
            state.record_error(e.to_string()).await;
            return Err(e.into());
        }
    };

    let stored = result.clone();
    update_workflow(&state, id, move |w| w.publish_result = Some(stored)).await?;
    Ok(Json(result))
}

/// Build publish routes
pub fn publish_routes() -> Router<AppState> {
    Router::new()
        .route("/api/publish/settings", get(settings))
        .route("/api/publish", post(publish))
}
