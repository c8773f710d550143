//! Draft generation and editing endpoints

use axum::{
    extract::State,
    routing::{post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::workflow::{load_workflow, require_stage, update_workflow};
use crate::models::{Draft, DraftOptions, Material, Stage, WorkflowState};
use crate::session::SessionId;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft: Draft,
    /// Long and on-tone enough for the image stage
    pub ready_for_image: bool,
    pub min_chars: usize,
    pub warnings: Vec<String>,
}

fn selected_material(workflow: &WorkflowState) -> ApiResult<Material> {
    require_stage(workflow, Stage::Draft)?;
    workflow
        .selected_material
        .as_ref()
        .map(|s| s.material.clone())
        .ok_or_else(|| ApiError::Conflict("Select a material first".to_string()))
}

/// Fill the speaker file name from the uploaded interview when not given
fn with_source_filename(mut options: DraftOptions, workflow: &WorkflowState) -> DraftOptions {
    if options.source_filename.is_none() {
        options.source_filename = workflow.interview.as_ref().map(|i| i.name.clone());
    }
    options
}

async fn store_draft(
    state: &AppState,
    id: uuid::Uuid,
    draft: Draft,
    warnings: Vec<String>,
) -> ApiResult<Json<DraftResponse>> {
    let min_chars = draft.min_chars();
    let ready_for_image = draft.ready_for_image(state.config.draft.ready_min_score);
    let stored = draft.clone();
    let warning = (!warnings.is_empty()).then(|| warnings.join(" "));
    update_workflow(state, id, move |w| {
        w.set_draft(stored);
        if let Some(warning) = warning {
            w.warn(warning);
        }
    })
    .await?;

    Ok(Json(DraftResponse {
        draft,
        ready_for_image,
        min_chars,
        warnings,
    }))
}

/// POST /api/draft/generate
pub async fn generate(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(options): Json<DraftOptions>,
) -> ApiResult<Json<DraftResponse>> {
    let workflow = load_workflow(&state, id).await?;
    let material = selected_material(&workflow)?;
    let options = with_source_filename(options, &workflow);

    let outcome = state.drafts.generate(&material, &options).await;
    if let Some(error) = outcome.error {
        state.record_error(error).await;
    }
    store_draft(&state, id, outcome.draft, outcome.warnings).await
}

/// POST /api/draft/sample
pub async fn sample(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(options): Json<DraftOptions>,
) -> ApiResult<Json<DraftResponse>> {
    let workflow = load_workflow(&state, id).await?;
    let material = selected_material(&workflow)?;
    let options = with_source_filename(options, &workflow);

    let draft = state.drafts.sample(&material, &options);
    store_draft(&state, id, draft, Vec::new()).await
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub title: String,
    pub content: String,
}

/// PUT /api/draft
pub async fn edit(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(req): Json<EditRequest>,
) -> ApiResult<Json<DraftResponse>> {
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::Draft)?;
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Draft content cannot be empty".to_string()));
    }

    let material = workflow.selected_material.as_ref().map(|s| &s.material);
    let length = workflow.draft.as_ref().map(|d| d.length).unwrap_or_default();
    let draft = state.drafts.edited(&req.title, req.content, material, length);
    store_draft(&state, id, draft, Vec::new()).await
}

/// Build draft routes
pub fn draft_routes() -> Router<AppState> {
    Router::new()
        .route("/api/draft", put(edit))
        .route("/api/draft/generate", post(generate))
        .route("/api/draft/sample", post(sample))
}
