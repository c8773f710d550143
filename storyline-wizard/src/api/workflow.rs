//! Stage navigation endpoints and shared workflow helpers

use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Stage, WorkflowState};
use crate::session::{SessionId, WizardSession};
use crate::{ApiError, ApiResult, AppState};

/// Sidebar entry
#[derive(Debug, Serialize)]
pub struct StepView {
    pub number: u8,
    pub stage: Stage,
    pub label: &'static str,
    pub accessible: bool,
    pub current: bool,
}

/// Everything the page needs to render the current session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub username: String,
    pub login_time: DateTime<Utc>,
    pub stage: Stage,
    pub stage_number: u8,
    pub steps: Vec<StepView>,
    pub workflow: WorkflowState,
}

pub fn step_views(workflow: &WorkflowState) -> Vec<StepView> {
    Stage::ALL
        .iter()
        .map(|stage| StepView {
            number: stage.number(),
            stage: *stage,
            label: stage.label(),
            accessible: workflow.is_step_accessible(*stage),
            current: *stage == workflow.stage,
        })
        .collect()
}

impl From<WizardSession> for SessionView {
    fn from(session: WizardSession) -> Self {
        Self {
            username: session.username,
            login_time: session.login_time,
            stage: session.workflow.stage,
            stage_number: session.workflow.stage.number(),
            steps: step_views(&session.workflow),
            workflow: session.workflow,
        }
    }
}

fn session_gone() -> ApiError {
    ApiError::Unauthorized("Session expired, please log in again".to_string())
}

/// Snapshot of the caller's workflow
pub async fn load_workflow(state: &AppState, id: Uuid) -> ApiResult<WorkflowState> {
    state.sessions.workflow(id).await.ok_or_else(session_gone)
}

/// Apply a change to the caller's workflow
pub async fn update_workflow<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut WorkflowState) -> R,
) -> ApiResult<R> {
    state.sessions.with_workflow(id, f).await.ok_or_else(session_gone)
}

/// 409 unless the stage's inputs exist
pub fn require_stage(workflow: &WorkflowState, stage: Stage) -> ApiResult<()> {
    if workflow.is_step_accessible(stage) {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!(
            "{} is not available yet; finish the previous step first",
            stage.label()
        )))
    }
}

async fn session_view(state: &AppState, id: Uuid) -> ApiResult<Json<SessionView>> {
    let session = state.sessions.get(id).await.ok_or_else(session_gone)?;
    Ok(Json(session.into()))
}

/// POST /api/workflow/next
pub async fn next_step(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> ApiResult<Json<SessionView>> {
    let workflow = load_workflow(&state, id).await?;
    let target = Stage::from_number_clamped(workflow.stage.number() as i64 + 1);
    require_stage(&workflow, target)?;

    let transition = update_workflow(&state, id, |w| w.next_step()).await?;
    tracing::info!(from = ?transition.old_stage, to = ?transition.new_stage, "Stage advanced");
    session_view(&state, id).await
}

/// POST /api/workflow/previous
pub async fn previous_step(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> ApiResult<Json<SessionView>> {
    update_workflow(&state, id, |w| w.previous_step()).await?;
    session_view(&state, id).await
}

/// POST /api/workflow/reset
pub async fn reset(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> ApiResult<Json<SessionView>> {
    update_workflow(&state, id, |w| w.reset()).await?;
    tracing::info!(session_id = %id, "Workflow reset");
    session_view(&state, id).await
}

/// POST /api/workflow/step/:n
pub async fn move_to_step(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Path(raw): Path<String>,
) -> ApiResult<Json<SessionView>> {
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Step must be a number, got `{}`", raw)))?;
    let workflow = load_workflow(&state, id).await?;
    require_stage(&workflow, Stage::from_number_clamped(n))?;
    update_workflow(&state, id, |w| w.move_to_step(n)).await?;
    session_view(&state, id).await
}

/// Build stage navigation routes
pub fn workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflow/next", post(next_step))
        .route("/api/workflow/previous", post(previous_step))
        .route("/api/workflow/reset", post(reset))
        .route("/api/workflow/step/:n", post(move_to_step))
}
