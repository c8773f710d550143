//! Shared fixtures for storyline-wizard integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use storyline_common::auth::CredentialStore;
use storyline_common::config::{TomlConfig, WordPressConfig};
use storyline_wizard::services::{
    ChatBackend, ChatRequest, ImageBackend, ImageError, ImageRequest, LlmError, WordPressClient,
};
use storyline_wizard::{build_router, AppState};
use tower::ServiceExt;

pub const TEST_USER: &str = "editor";
pub const TEST_PASSWORD: &str = "correct horse";

/// Chat backend that replays queued responses and records every request
#[derive(Default)]
pub struct ScriptedChat {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every call fails as if no API key were configured
    pub fn offline() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::MissingApiKey))
    }
}

/// Image backend that hands out distinct URLs
#[derive(Default)]
pub struct CountingImages {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ImageBackend for CountingImages {
    async fn generate(&self, _request: ImageRequest) -> Result<String, ImageError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://images.example.test/{}.png", n))
    }
}

/// WordPress settings pointing at a port nothing listens on
pub fn unreachable_wordpress() -> WordPressConfig {
    WordPressConfig {
        url: Some("http://127.0.0.1:1".to_string()),
        username: Some("editor".to_string()),
        application_password: Some("xxxx yyyy".to_string()),
        timeout_secs: 2,
        ..WordPressConfig::default()
    }
}

pub fn test_credentials() -> CredentialStore {
    CredentialStore::from_pairs([(TEST_USER, TEST_PASSWORD)])
}

/// App state with scripted backends
pub fn test_app_state_with(chat: Arc<ScriptedChat>, images: Option<Arc<CountingImages>>) -> AppState {
    let config = TomlConfig {
        wordpress: unreachable_wordpress(),
        ..TomlConfig::default()
    };
    let publisher = WordPressClient::new(&config.wordpress).unwrap();
    let images = images.map(|i| i as Arc<dyn ImageBackend>);
    AppState::new(config, test_credentials(), chat, images, publisher)
}

/// App state whose LLM is always unavailable
pub fn test_app_state() -> AppState {
    test_app_state_with(ScriptedChat::offline(), Some(Arc::new(CountingImages::default())))
}

pub fn test_app() -> Router {
    build_router(test_app_state())
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Log in and return the `name=value` cookie pair
pub async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"username":"{}","password":"{}"}}"#,
                    TEST_USER, TEST_PASSWORD
                )))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Authenticated request with an optional JSON body
pub async fn call(app: &Router, cookie: &str, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Multipart body with a single `file` field
pub fn multipart_upload(file_name: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "storyline-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}
