//! WordPress REST publisher
//!
//! Creates posts through `POST {site}/wp-json/wp/v2/posts` using an
//! application password over basic auth.

use serde::Serialize;
use std::time::Duration;
use storyline_common::config::WordPressConfig;
use thiserror::Error;

use crate::models::{PublishRequest, PublishResult};

const USER_AGENT: &str = concat!("storyline-wizard/", env!("CARGO_PKG_VERSION"));
const POSTS_PATH: &str = "/wp-json/wp/v2";

/// Publisher errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("WordPress is not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("WordPress returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Connection details shown in the UI (never the password)
#[derive(Debug, Clone, Serialize)]
pub struct PublishSettings {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub default_status: String,
    pub default_categories: Vec<u64>,
    pub default_tags: Vec<u64>,
    pub configured: bool,
}

/// `{site}/wp-json/wp/v2`; a URL already pointing at the API root is kept
pub fn api_root(site_url: &str) -> String {
    let trimmed = site_url.trim().trim_end_matches('/');
    if trimmed.ends_with(POSTS_PATH) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, POSTS_PATH)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// WordPress REST client
pub struct WordPressClient {
    http_client: reqwest::Client,
    api_root: Option<String>,
    username: Option<String>,
    application_password: Option<String>,
    config: WordPressConfig,
}

impl WordPressClient {
    pub fn new(config: &WordPressConfig) -> Result<Self, PublishError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PublishError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_root: non_blank(&config.url).map(|url| api_root(&url)),
            username: non_blank(&config.username),
            application_password: non_blank(&config.application_password),
            config: config.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_root.is_some() && self.username.is_some() && self.application_password.is_some()
    }

    pub fn settings(&self) -> PublishSettings {
        PublishSettings {
            endpoint: self.api_root.clone(),
            username: self.username.clone(),
            default_status: self.config.default_status.clone(),
            default_categories: self.config.default_categories.clone(),
            default_tags: self.config.default_tags.clone(),
            configured: self.is_configured(),
        }
    }

    /// Fill an empty status, category list or tag list from configuration
    pub fn with_defaults(&self, mut request: PublishRequest) -> PublishRequest {
        if request.status.trim().is_empty() {
            request.status = self.config.default_status.clone();
        }
        if request.categories.is_empty() {
            request.categories = self.config.default_categories.clone();
        }
        if request.tags.is_empty() {
            request.tags = self.config.default_tags.clone();
        }
        request
    }

    /// Create a post
    pub async fn publish(&self, request: PublishRequest) -> Result<PublishResult, PublishError> {
        let api_root = self
            .api_root
            .as_deref()
            .ok_or_else(|| PublishError::NotConfigured("site URL is empty".to_string()))?;
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| PublishError::NotConfigured("username is empty".to_string()))?;
        let password = self
            .application_password
            .as_deref()
            .ok_or_else(|| PublishError::NotConfigured("application password is empty".to_string()))?;

        let request = self.with_defaults(request);
        let url = format!("{}/posts", api_root);

        tracing::info!(
            stage = "publish",
            endpoint = %url,
            status = %request.status,
            categories = request.categories.len(),
            tags = request.tags.len(),
            "Publishing post"
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(username, Some(password))
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(stage = "publish", status = status.as_u16(), "WordPress rejected the post");
            return Err(PublishError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PublishError::Parse(e.to_string()))?;
        let result = PublishResult::from_response(raw);

        tracing::info!(stage = "publish", post_id = result.post_id, status = %result.status, "Post created");
        Ok(result)
    }
}
