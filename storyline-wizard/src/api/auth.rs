//! Login, logout and the session gate
//!
//! Protected routes run behind [`auth_middleware`], which resolves the
//! session cookie and hands the session id to handlers as a request
//! extension.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::workflow::SessionView;
use crate::session::{clear_session_cookie, session_cookie, session_id_from_headers, SessionId};
use crate::{ApiError, ApiResult, AppState};

/// Reject requests without a live session
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let id = session_id_from_headers(request.headers())
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    if state.sessions.get(id).await.is_none() {
        return Err(ApiError::Unauthorized(
            "Session expired, please log in again".to_string(),
        ));
    }

    request.extensions_mut().insert(SessionId(id));
    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    if !state.credentials.authenticate(username, &req.password) {
        tracing::warn!(user = %username, "Login failed");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    // Expired sessions are only swept on login
    let purged = state.sessions.purge_expired().await;
    if purged > 0 {
        tracing::debug!(purged, "Expired sessions removed");
    }

    let id = state.sessions.create(username).await;
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::Internal("Session vanished after login".to_string()))?;
    let cookie = session_cookie(id, state.sessions.ttl());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SessionView::from(session)),
    )
        .into_response())
}

/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Response {
    state.sessions.remove(id).await;
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "logged_out": true })),
    )
        .into_response()
}

/// GET /api/session
pub async fn current_session(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> ApiResult<Json<SessionView>> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Session expired, please log in again".to_string()))?;
    Ok(Json(session.into()))
}

/// Public login route
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/api/login", post(login))
}

/// Routes that need an existing session
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/logout", post(logout))
        .route("/api/session", get(current_session))
}
