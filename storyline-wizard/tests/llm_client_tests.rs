//! Chat and image clients against a local mock of the OpenAI-compatible API

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use storyline_common::config::{ImageConfig, LlmConfig};
use storyline_wizard::services::{
    ChatBackend, ChatRequest, ImageBackend, ImageError, ImageRequest, LlmError, OpenAiChatClient,
    OpenAiImageClient,
};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<String>>>,
}

/// Start a mock server with the given reply; returns its base URL
async fn spawn_mock(status: StatusCode, reply: Value, recorded: Recorded) -> String {
    async fn handler(
        State((status, reply, recorded)): State<(StatusCode, Value, Recorded)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        recorded.bodies.lock().unwrap().push(body);
        if let Some(auth) = headers.get("authorization") {
            recorded.auth.lock().unwrap().push(auth.to_str().unwrap().to_string());
        }
        (status, Json(reply))
    }

    let app = Router::new()
        .route("/v1/chat/completions", post(handler))
        .route("/v1/images/generations", post(handler))
        .with_state((status, reply, recorded));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn llm_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("sk-test".to_string()),
        base_url: base_url.to_string(),
        model: "gpt-test".to_string(),
        ..LlmConfig::default()
    }
}

#[tokio::test]
async fn chat_completion_returns_trimmed_content() {
    let recorded = Recorded::default();
    let base = spawn_mock(
        StatusCode::OK,
        json!({"choices": [{"message": {"role": "assistant", "content": "  안녕하세요  \n"}}]}),
        recorded.clone(),
    )
    .await;

    let client = OpenAiChatClient::new(&llm_config(&base)).unwrap();
    let request = ChatRequest::new("system", "user prompt")
        .temperature(0.3)
        .top_p(0.9)
        .max_tokens(500);
    let text = client.complete(request).await.unwrap();

    assert_eq!(text, "안녕하세요");

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "gpt-test");
    assert_eq!(bodies[0]["max_tokens"], 500);
    assert_eq!(bodies[0]["messages"][1]["content"], "user prompt");
    assert!((bodies[0]["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert_eq!(recorded.auth.lock().unwrap()[0], "Bearer sk-test");
}

#[tokio::test]
async fn chat_http_error_carries_status() {
    let base = spawn_mock(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "rate limited"}}),
        Recorded::default(),
    )
    .await;

    let client = OpenAiChatClient::new(&llm_config(&base)).unwrap();
    let err = client.complete(ChatRequest::new("s", "u")).await.unwrap_err();

    match err {
        LlmError::ApiError(status, body) => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn chat_empty_message_is_an_error() {
    let base = spawn_mock(
        StatusCode::OK,
        json!({"choices": [{"message": {"content": "   "}}]}),
        Recorded::default(),
    )
    .await;

    let client = OpenAiChatClient::new(&llm_config(&base)).unwrap();
    let err = client.complete(ChatRequest::new("s", "u")).await.unwrap_err();
    assert!(matches!(err, LlmError::EmptyResponse));
}

#[tokio::test]
async fn image_client_reads_url() {
    let recorded = Recorded::default();
    let base = spawn_mock(
        StatusCode::OK,
        json!({"data": [{"url": "https://cdn.example.test/a.png"}]}),
        recorded.clone(),
    )
    .await;

    let client = OpenAiImageClient::new(&llm_config(&base), &ImageConfig::default()).unwrap();
    let url = client
        .generate(ImageRequest {
            prompt: "bright clinic".to_string(),
            size: "1024x1024".to_string(),
            seed: Some(42),
        })
        .await
        .unwrap();

    assert_eq!(url, "https://cdn.example.test/a.png");
    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies[0]["prompt"], "bright clinic");
    assert_eq!(bodies[0]["n"], 1);
    assert_eq!(bodies[0]["seed"], 42);
}

#[tokio::test]
async fn image_client_turns_base64_into_data_url() {
    let base = spawn_mock(
        StatusCode::OK,
        json!({"data": [{"b64_json": "iVBORw0KGgo="}]}),
        Recorded::default(),
    )
    .await;

    let client = OpenAiImageClient::new(&llm_config(&base), &ImageConfig::default()).unwrap();
    let url = client
        .generate(ImageRequest {
            prompt: "p".to_string(),
            size: "1024x1024".to_string(),
            seed: None,
        })
        .await
        .unwrap();

    assert_eq!(url, "data:image/png;base64,iVBORw0KGgo=");
}

#[tokio::test]
async fn image_client_without_data_fails() {
    let base = spawn_mock(StatusCode::OK, json!({"data": []}), Recorded::default()).await;

    let client = OpenAiImageClient::new(&llm_config(&base), &ImageConfig::default()).unwrap();
    let err = client
        .generate(ImageRequest {
            prompt: "p".to_string(),
            size: "1024x1024".to_string(),
            seed: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ImageError::NoImage));
}
