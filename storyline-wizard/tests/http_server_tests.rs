//! HTTP server and wizard flow integration tests
//!
//! Requests go straight into the router with `oneshot`; the LLM is offline so
//! every stage exercises its fallback path.

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use helpers::*;
use storyline_wizard::build_router;

#[tokio::test]
async fn root_route_serves_html() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("text/html"));
    let html = body_text(response).await;
    assert!(html.contains("/static/wizard.js"));
    assert!(html.contains(r#"data-stage="PUBLISH""#));
}

#[tokio::test]
async fn static_assets_have_content_types() {
    let app = test_app();

    for (uri, expected) in [
        ("/static/wizard.js", "javascript"),
        ("/static/wizard.css", "text/css"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let content_type = response.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.contains(expected), "{} served as {}", uri, content_type);
    }
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "storyline-wizard");
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn protected_routes_require_session() {
    let app = test_app();

    for (method, uri) in [
        ("GET", "/api/session"),
        ("POST", "/api/upload/sample"),
        ("POST", "/api/materials/analyze"),
        ("POST", "/api/workflow/next"),
        ("POST", "/api/publish"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn unknown_session_cookie_is_rejected() {
    let app = test_app();

    let response = call(
        &app,
        "storyline_session=00000000-0000-0000-0000-000000000000",
        "GET",
        "/api/session",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn login_rejects_bad_password() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"editor","password":"wrong"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn login_rejects_blank_fields() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"  ","password":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_starts_at_upload_stage() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = call(&app, &cookie, "GET", "/api/session", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["username"], TEST_USER);
    assert_eq!(json["stage"], "UPLOAD");
    assert_eq!(json["stage_number"], 1);
    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 5);
    assert_eq!(steps[0]["accessible"], true);
    assert_eq!(steps[1]["accessible"], false);
}

#[tokio::test]
async fn logout_ends_session() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = call(&app, &cookie, "POST", "/api/logout", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    let response = call(&app, &cookie, "GET", "/api/session", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn next_step_blocked_without_interview() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = call(&app, &cookie, "POST", "/api/workflow/next", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = call(&app, &cookie, "POST", "/api/materials/analyze", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn upload_text_file_returns_preview() {
    let app = test_app();
    let cookie = login(&app).await;

    let text = "인터뷰어: 오늘 어떤 환자분이 기억에 남으세요?\n검안사: 라식 수술 상담을 받은 직장인 환자분이요.";
    let (content_type, body) = multipart_upload("간호사_박지현.txt", text.as_bytes());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "간호사_박지현.txt");
    assert_eq!(json["kind"], "txt");
    assert_eq!(json["chars"], text.chars().count());
    assert_eq!(json["preview"], text);

    let response = call(&app, &cookie, "GET", "/api/session", None).await;
    let json = body_json(response).await;
    assert_eq!(json["steps"][1]["accessible"], true);
}

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let app = test_app();
    let cookie = login(&app).await;

    let (content_type, body) = multipart_upload("notes.exe", b"MZ");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/upload")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Drive the wizard through upload, analyze and select; returns the cookie
async fn prepare_selected_material(app: &axum::Router) -> String {
    let cookie = login(app).await;

    let response = call(app, &cookie, "POST", "/api/upload/sample", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = call(app, &cookie, "POST", "/api/materials/analyze", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = call(
        app,
        &cookie,
        "POST",
        "/api/materials/select",
        Some(json!({"category": "Patient Episode", "index": 0})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie
}

#[tokio::test]
async fn analyze_falls_back_to_sample_materials() {
    let app = test_app();
    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;

    let response = call(&app, &cookie, "POST", "/api/materials/analyze", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["used_fallback"], true);
    assert!(!json["warnings"].as_array().unwrap().is_empty());
    let materials = json["materials"].as_object().unwrap();
    assert_eq!(materials.len(), 5);
    for items in materials.values() {
        assert_eq!(items.as_array().unwrap().len(), 1);
    }

    let response = call(&app, &cookie, "GET", "/api/session", None).await;
    let json = body_json(response).await;
    assert_eq!(json["workflow"]["materials_from_fallback"], true);
    assert!(json["workflow"]["last_warning"].is_string());
}

#[tokio::test]
async fn select_out_of_range_is_not_found() {
    let app = test_app();
    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;
    call(&app, &cookie, "POST", "/api/materials/analyze", None).await;

    let response = call(
        &app,
        &cookie,
        "POST",
        "/api/materials/select",
        Some(json!({"category": "Patient FAQ", "index": 9})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn draft_requires_selected_material() {
    let app = test_app();
    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;
    call(&app, &cookie, "POST", "/api/materials/analyze", None).await;

    let response = call(&app, &cookie, "POST", "/api/draft/sample", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn sample_draft_unlocks_image_stage() {
    let app = test_app();
    let cookie = prepare_selected_material(&app).await;

    let response = call(
        &app,
        &cookie,
        "POST",
        "/api/draft/sample",
        Some(json!({"style": "nurse_care"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let draft = &json["draft"];
    assert_eq!(draft["source"], "sample");
    let content = draft["content"].as_str().unwrap();
    // File name 검안사_김서연 beats the nurse preset's default speaker
    assert!(content.contains("검안사"));
    assert!(content.contains("김서연"));
    assert!(draft["char_count"].as_u64().unwrap() > 0);

    let response = call(&app, &cookie, "GET", "/api/session", None).await;
    let json = body_json(response).await;
    assert_eq!(json["steps"][3]["accessible"], true);
    assert_eq!(json["steps"][4]["accessible"], true);
}

#[tokio::test]
async fn offline_generate_uses_sample_with_warning() {
    let app = test_app();
    let cookie = prepare_selected_material(&app).await;

    let response = call(&app, &cookie, "POST", "/api/draft/generate", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["draft"]["source"], "sample");
    assert!(!json["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn edited_draft_is_rescored() {
    let app = test_app();
    let cookie = prepare_selected_material(&app).await;

    let response = call(
        &app,
        &cookie,
        "PUT",
        "/api/draft",
        Some(json!({"title": "내가 고친 제목", "content": "짧은 본문입니다."})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["draft"]["title"], "내가 고친 제목");
    assert_eq!(json["draft"]["source"], "edited");
    assert_eq!(json["draft"]["char_count"], 9);
    assert_eq!(json["ready_for_image"], false);

    let response = call(
        &app,
        &cookie,
        "PUT",
        "/api/draft",
        Some(json!({"title": "t", "content": "   "})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_keeps_length_tier_of_generated_draft() {
    let app = test_app();
    let cookie = prepare_selected_material(&app).await;

    let response = call(
        &app,
        &cookie,
        "POST",
        "/api/draft/sample",
        Some(json!({"length": "premium"})),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["min_chars"], 3000);
    assert_eq!(json["draft"]["length"], "premium");

    let content = format!("# 고친 제목\n\n{}", "수술 후 아침이 달라졌어요. ".repeat(150));
    assert!(content.chars().count() > 2_100 && content.chars().count() < 3_000);
    let response = call(
        &app,
        &cookie,
        "PUT",
        "/api/draft",
        Some(json!({"title": "", "content": content})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["min_chars"], 3000);
    assert_eq!(json["draft"]["length"], "premium");
    assert_eq!(json["ready_for_image"], false);
}

#[tokio::test]
async fn image_variants_are_distinct_and_selectable() {
    let images = Arc::new(CountingImages::default());
    let app = build_router(test_app_state_with(ScriptedChat::offline(), Some(images.clone())));
    let cookie = prepare_selected_material(&app).await;
    call(&app, &cookie, "POST", "/api/draft/sample", Some(json!({}))).await;

    let response = call(&app, &cookie, "POST", "/api/image/generate", Some(json!({"n": 3}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let variants = json["variants"].as_array().unwrap();
    assert_eq!(variants.len(), 3);
    assert_eq!(json["used_stock"], false);
    assert_eq!(json["selected"]["url"], variants[0]["url"]);
    assert_ne!(variants[0]["url"], variants[1]["url"]);

    let response = call(&app, &cookie, "POST", "/api/image/select", Some(json!({"index": 2}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = call(&app, &cookie, "GET", "/api/session", None).await;
    let json = body_json(response).await;
    assert_eq!(json["workflow"]["image"]["url"], variants[2]["url"]);
}

#[tokio::test]
async fn image_without_backend_uses_stock() {
    let app = build_router(test_app_state_with(ScriptedChat::offline(), None));
    let cookie = prepare_selected_material(&app).await;
    call(&app, &cookie, "POST", "/api/draft/sample", Some(json!({}))).await;

    let response = call(&app, &cookie, "POST", "/api/image/generate", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["used_stock"], true);
    assert_eq!(json["variants"].as_array().unwrap().len(), 1);
    assert_eq!(json["selected"]["source"], "stock");
}

#[tokio::test]
async fn failed_publish_keeps_session_state() {
    let app = test_app();
    let cookie = prepare_selected_material(&app).await;
    call(&app, &cookie, "POST", "/api/draft/sample", Some(json!({}))).await;

    let before: Value = body_json(call(&app, &cookie, "GET", "/api/session", None).await).await;

    let response = call(&app, &cookie, "POST", "/api/publish", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");

    let after: Value = body_json(call(&app, &cookie, "GET", "/api/session", None).await).await;
    assert_eq!(after["workflow"]["draft"], before["workflow"]["draft"]);
    assert!(after["workflow"]["publish_result"].is_null());

    let health = body_json(
        app.clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;
    assert!(health["last_error"].as_str().unwrap().contains("Network error"));
}

#[tokio::test]
async fn fallbacks_are_reported_in_health() {
    let app = test_app();
    let health_error = |app: axum::Router| async move {
        let health = body_json(
            app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        health["last_error"].as_str().map(str::to_string)
    };
    assert_eq!(health_error(app.clone()).await, None);

    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;
    call(&app, &cookie, "POST", "/api/materials/analyze", None).await;
    let error = health_error(app.clone()).await.unwrap();
    assert!(error.contains("sample materials"));

    call(
        &app,
        &cookie,
        "POST",
        "/api/materials/select",
        Some(json!({"category": "Patient Episode", "index": 0})),
    )
    .await;
    call(&app, &cookie, "POST", "/api/draft/generate", Some(json!({}))).await;
    let error = health_error(app.clone()).await.unwrap();
    assert!(error.starts_with("Draft generation failed"));
}

#[tokio::test]
async fn reset_returns_to_upload() {
    let app = test_app();
    let cookie = prepare_selected_material(&app).await;

    let response = call(&app, &cookie, "POST", "/api/workflow/step/3", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["stage"], "DRAFT");

    let response = call(&app, &cookie, "POST", "/api/workflow/reset", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["stage"], "UPLOAD");
    assert!(json["workflow"]["interview"].is_null());
    assert!(json["workflow"]["materials"].is_null());
}

#[tokio::test]
async fn non_numeric_step_is_json_bad_request() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = call(&app, &cookie, "POST", "/api/workflow/step/three", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json["error"]["message"].as_str().unwrap().contains("three"));
}

#[tokio::test]
async fn sessions_are_isolated() {
    let app = test_app();
    let first = login(&app).await;
    let second = login(&app).await;
    assert_ne!(first, second);

    call(&app, &first, "POST", "/api/upload/sample", None).await;

    let json = body_json(call(&app, &second, "GET", "/api/session", None).await).await;
    assert!(json["workflow"]["interview"].is_null());
}
