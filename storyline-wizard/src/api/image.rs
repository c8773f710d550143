//! Image generation endpoints

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::workflow::{load_workflow, require_stage, update_workflow};
use crate::models::{ImageResult, Stage};
use crate::session::SessionId;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    /// Variants to produce; configuration default when absent
    pub n: Option<usize>,
    /// Prompt override; built from the draft when absent
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub prompt: String,
    pub variants: Vec<ImageResult>,
    pub selected: Option<ImageResult>,
    pub used_stock: bool,
    pub warnings: Vec<String>,
}

/// POST /api/image/generate
pub async fn generate(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<ImageResponse>> {
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::Image)?;
    let draft = workflow
        .draft
        .ok_or_else(|| ApiError::Conflict("Write a draft first".to_string()))?;

    let prompt = req
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| state.images.prompt_for(&draft));
    let n = req.n.unwrap_or(state.config.image.variants as usize);

    let outcome = state.images.generate_variants(&prompt, n).await;
    if !outcome.warnings.is_empty() {
        state.record_error(outcome.warnings.join(" ")).await;
    }

    let variants = outcome.variants.clone();
    let selected = variants.first().cloned();
    let stored_selected = selected.clone();
    let warning = (!outcome.warnings.is_empty()).then(|| outcome.warnings.join(" "));
    update_workflow(&state, id, move |w| {
        w.image_variants = variants;
        w.image = stored_selected;
        if let Some(warning) = warning {
            w.warn(warning);
        }
    })
    .await?;

    Ok(Json(ImageResponse {
        prompt,
        variants: outcome.variants,
        selected,
        used_stock: outcome.used_stock,
        warnings: outcome.warnings,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// POST /api/image/select
pub async fn select(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(req): Json<SelectRequest>,
) -> ApiResult<Json<ImageResult>> {
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::Image)?;
    let image = workflow
        .image_variants
        .get(req.index)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("No image variant #{}", req.index)))?;

    let stored = image.clone();
    update_workflow(&state, id, move |w| w.image = Some(stored)).await?;
    Ok(Json(image))
}

/// Build image routes
pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/api/image/generate", post(generate))
        .route("/api/image/select", post(select))
}
