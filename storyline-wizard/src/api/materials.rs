//! Material extraction and selection endpoints

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::workflow::{load_workflow, require_stage, update_workflow};
use crate::models::{CategorizedMaterials, MaterialCategory, SelectedMaterial, Stage};
use crate::session::SessionId;
use crate::{ApiError, ApiResult, AppState};

/// Tab header
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub category: MaterialCategory,
    pub description: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub materials: CategorizedMaterials,
    pub categories: Vec<CategorySummary>,
    pub used_fallback: bool,
    pub valid_items: usize,
    pub warnings: Vec<String>,
}

/// POST /api/materials/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::Materials)?;
    let interview = workflow
        .interview
        .ok_or_else(|| ApiError::Conflict("Upload an interview first".to_string()))?;

    let outcome = state.extractor.extract(&interview.text).await;
    if outcome.used_fallback {
        if let Some(reason) = outcome.warnings.last() {
            state.record_error(reason.clone()).await;
        }
    }

    let materials = outcome.materials.clone();
    let used_fallback = outcome.used_fallback;
    let warning = (!outcome.warnings.is_empty()).then(|| outcome.warnings.join(" "));
    update_workflow(&state, id, move |w| {
        w.set_materials(materials, used_fallback);
        if let Some(warning) = warning {
            w.warn(warning);
        }
    })
    .await?;

    let categories = outcome
        .materials
        .iter()
        .map(|(category, items)| CategorySummary {
            category,
            description: category.description(),
            count: items.len(),
        })
        .collect();

    Ok(Json(AnalyzeResponse {
        materials: outcome.materials,
        categories,
        used_fallback: outcome.used_fallback,
        valid_items: outcome.valid_items,
        warnings: outcome.warnings,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub category: MaterialCategory,
    pub index: usize,
}

/// POST /api/materials/select
pub async fn select(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(req): Json<SelectRequest>,
) -> ApiResult<Json<SelectedMaterial>> {
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::Draft)?;
    let materials = workflow
        .materials
        .ok_or_else(|| ApiError::Conflict("Analyze the interview first".to_string()))?;

    let material = materials
        .get(req.category)
        .get(req.index)
        .cloned()
        .ok_or_else(|| {
            ApiError::NotFound(format!("No material #{} in {}", req.index, req.category))
        })?;

    let selected = SelectedMaterial {
        category: req.category,
        index: req.index,
        material,
    };
    let stored = selected.clone();
    update_workflow(&state, id, move |w| w.selected_material = Some(stored)).await?;
    tracing::info!(category = %req.category, index = req.index, "Material selected");

    Ok(Json(selected))
}

/// Build material routes
pub fn materials_routes() -> Router<AppState> {
    Router::new()
        .route("/api/materials/analyze", post(analyze))
        .route("/api/materials/select", post(select))
}
