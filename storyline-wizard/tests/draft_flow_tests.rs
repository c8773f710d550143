//! Extraction and drafting through the HTTP API with a scripted model

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};

use helpers::*;
use storyline_wizard::build_router;

const QUOTE: &str = "마스크를 쓰면 안경에 김이 서려서 너무 불편했어요";

fn material_item(title: &str) -> Value {
    let content = format!(
        "{}. 라식 수술 상담을 받으러 오신 직장인 환자분의 이야기입니다. {}",
        QUOTE,
        "수술 후 회복 과정에서 달라진 아침 일상을 자세히 들려주셨어요. ".repeat(3)
    );
    json!({
        "title": title,
        "content": content,
        "keywords": ["라식", "수술", "회복", "일상"],
        "usage_point": "수술 후기 중심으로 풀어내기",
        "staff_perspective": "검안사",
        "source_quote": QUOTE,
        "evidence_span": [0, QUOTE.chars().count()],
    })
}

fn extraction_reply() -> String {
    let items: Vec<Value> = (1..=4).map(|i| material_item(&format!("라식 이야기 {}", i))).collect();
    format!("Here you go:\n```json\n{}\n```", json!({ "materials": items }))
}

fn outline_reply() -> String {
    json!({
        "title": "마스크 김서림과 이별한 아침",
        "h2_sections": [
            {"h2": "상담실에서 만난 고민", "bullets": ["김서림"]},
            {"h2": "수술 후 달라진 일상", "bullets": ["회복"]}
        ]
    })
    .to_string()
}

fn long_draft() -> String {
    let mut text = String::from(
        "# 마스크 김서림과 이별한 아침\n\n안녕하세요, **밝은눈안과** 검안사 **김서연**입니다.\n\n",
    );
    while text.chars().count() < 2_100 {
        text.push_str("## 상담실 이야기\n수술 후 첫 아침, 환자분은 정말 기뻐하셨어요. 저도 마음이 따뜻해졌답니다.\n\n");
    }
    text.push_str("이상으로 **밝은눈안과** 검안사 김서연이었습니다. 좋은 하루 보내세요!");
    text
}

#[tokio::test]
async fn scripted_model_drives_extraction_and_draft() {
    let chat = ScriptedChat::new(vec![
        Ok(extraction_reply()),
        Ok(outline_reply()),
        Ok(long_draft()),
    ]);
    let app = build_router(test_app_state_with(chat.clone(), None));
    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;

    let response = call(&app, &cookie, "POST", "/api/materials/analyze", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["used_fallback"], false);
    assert_eq!(json["valid_items"], 4);
    assert_eq!(json["materials"]["Patient Episode"].as_array().unwrap().len(), 4);
    assert_eq!(
        json["materials"]["Patient Episode"][0]["evidence_span"],
        json!([0, QUOTE.chars().count()])
    );

    let response = call(
        &app,
        &cookie,
        "POST",
        "/api/materials/select",
        Some(json!({"category": "Patient Episode", "index": 2})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["material"]["title"], "라식 이야기 3");

    let response = call(&app, &cookie, "POST", "/api/draft/generate", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["draft"]["source"], "llm");
    assert_eq!(json["draft"]["lengthen_passes"], 0);
    assert_eq!(json["draft"]["title"], "마스크 김서림과 이별한 아침");
    assert!(json["warnings"].as_array().unwrap().is_empty());

    // extraction + outline + draft, no lengthen pass needed
    assert_eq!(chat.calls(), 3);
    let requests = chat.requests.lock().unwrap();
    assert!(requests[2].user_prompt().contains("상담실에서 만난 고민"));
}

#[tokio::test]
async fn too_few_valid_items_falls_back() {
    let mut items: Vec<Value> = (1..=3).map(|i| material_item(&format!("이야기 {}", i))).collect();
    let mut broken = material_item("인용 없는 소재");
    broken["source_quote"] = json!("인터뷰에 없는 문장");
    items.push(broken);

    let chat = ScriptedChat::new(vec![Ok(json!({ "materials": items }).to_string())]);
    let app = build_router(test_app_state_with(chat, None));
    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;

    let json = body_json(call(&app, &cookie, "POST", "/api/materials/analyze", None).await).await;
    assert_eq!(json["used_fallback"], true);
    assert_eq!(json["valid_items"], 0);
}

#[tokio::test]
async fn korean_item_key_is_accepted() {
    let items: Vec<Value> = (1..=4).map(|i| material_item(&format!("소재 {}", i))).collect();
    let chat = ScriptedChat::new(vec![Ok(json!({ "키워드 기반 소재": items }).to_string())]);
    let app = build_router(test_app_state_with(chat, None));
    let cookie = login(&app).await;
    call(&app, &cookie, "POST", "/api/upload/sample", None).await;

    let json = body_json(call(&app, &cookie, "POST", "/api/materials/analyze", None).await).await;
    assert_eq!(json["used_fallback"], false);
    assert_eq!(json["valid_items"], 4);
}
