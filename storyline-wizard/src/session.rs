//! Login sessions and their workflow state
//!
//! Sessions live in memory only. Each holds one [`WorkflowState`]; logging
//! out, resetting or expiry discards it.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::WorkflowState;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "storyline_session";

/// Session id attached to authenticated requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// One logged-in user
#[derive(Debug, Clone, Serialize)]
pub struct WizardSession {
    pub id: Uuid,
    pub username: String,
    pub login_time: DateTime<Utc>,
    pub workflow: WorkflowState,
}

impl WizardSession {
    fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.login_time >= ttl
    }
}

/// In-memory session table
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session with a fresh workflow
    pub async fn create(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        let session = WizardSession {
            id,
            username: username.to_string(),
            login_time: Utc::now(),
            workflow: WorkflowState::new(),
        };
        self.sessions.write().await.insert(id, session);
        tracing::info!(user = %username, session_id = %id, "Session created");
        id
    }

    /// Live session by id; an expired one is dropped and reported missing
    pub async fn get(&self, id: Uuid) -> Option<WizardSession> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&id) {
                Some(s) if !s.is_expired(self.ttl, now) => return Some(s.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        if let Some(expired) = self.sessions.write().await.remove(&id) {
            tracing::info!(user = %expired.username, session_id = %id, "Session expired");
        }
        None
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        if let Some(session) = &removed {
            tracing::info!(user = %session.username, session_id = %id, "Session ended");
        }
        removed.is_some()
    }

    /// Snapshot of a session's workflow
    pub async fn workflow(&self, id: Uuid) -> Option<WorkflowState> {
        self.get(id).await.map(|s| s.workflow)
    }

    /// Mutate a session's workflow in place
    pub async fn with_workflow<R>(&self, id: Uuid, f: impl FnOnce(&mut WorkflowState) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(|s| f(&mut s.workflow))
    }

    /// Drop every expired session, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    async fn backdate(&self, id: Uuid, by: Duration) {
        if let Some(s) = self.sessions.write().await.get_mut(&id) {
            s.login_time = s.login_time - by;
        }
    }
}

/// Session id from the `Cookie` header, if present and well-formed
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(id: Uuid, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        id,
        ttl.num_seconds()
    )
}

/// `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
