use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use deckgen_core::{Deck, Slide, SlideSource};
use deckgen_llm::{ChatClient, ModelConfig};
use deckgen_pptx::PptxReader;
use deckgen_server::{router, AppState};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;

const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_app(default_source: SlideSource, client: Option<ChatClient>) -> String {
    spawn(router(AppState {
        default_source,
        client,
        cors_origins: vec!["http://localhost:3000".to_string()],
    }))
    .await
}

/// Fake chat-completions endpoint that always answers with `content`.
async fn spawn_model(content: &str) -> ChatClient {
    async fn chat(State(content): State<Arc<String>>, Json(_): Json<Value>) -> Json<Value> {
        Json(json!({ "choices": [{ "message": { "role": "assistant", "content": *content } }] }))
    }

    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .with_state(Arc::new(content.to_string()));
    let base = spawn(app).await;

    let config = ModelConfig::default()
        .with_endpoint(format!("{}/v1/chat/completions", base))
        .with_api_key("test-key");
    ChatClient::new(config).unwrap()
}

async fn read_deck(response: reqwest::Response) -> Deck {
    let bytes = response.bytes().await.unwrap();
    PptxReader::new().read(Cursor::new(bytes.to_vec())).unwrap()
}

async fn error_message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "healthy", "message": "Slide Generator API is running" })
    );
}

#[tokio::test]
async fn test_missing_prompt() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No prompt provided");
}

#[tokio::test]
async fn test_short_prompt() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "  too short " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(response).await,
        "Prompt must be at least 10 characters long"
    );
}

#[tokio::test]
async fn test_unknown_source() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "A perfectly fine prompt", "source": "oracle" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("oracle"));
}

#[tokio::test]
async fn test_heuristic_generate() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let prompt = "Slide: Intro\n- Hello\n- World\nSlide: Next steps\n- Ship it";
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": prompt }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], PPTX_MIME);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"GeneratedDeck.pptx\""
    );

    let deck = read_deck(response).await;
    assert_eq!(
        deck,
        Deck::from(vec![
            Slide::new("Intro").with_bullet("Hello").with_bullet("World"),
            Slide::new("Next steps").with_bullet("Ship it"),
        ])
    );
}

#[tokio::test]
async fn test_model_generate() {
    let client = spawn_model(
        "<slide><title>Rust</title><bullet>Fast</bullet><bullet>Safe</bullet></slide>",
    )
    .await;
    let base = spawn_app(SlideSource::Heuristic, Some(client)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "Why should I learn Rust?", "source": "model" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let deck = read_deck(response).await;
    assert_eq!(deck.len(), 1);
    assert_eq!(deck.slides[0].title, "Rust");
    assert_eq!(deck.slides[0].bullets, vec!["Fast", "Safe"]);
}

#[tokio::test]
async fn test_default_source_is_used() {
    let client = spawn_model("<slide><title>From model</title><bullet>Yes</bullet></slide>").await;
    let base = spawn_app(SlideSource::Model, Some(client)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "Slide: Heuristic title\n- no" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_deck(response).await.title(), Some("From model"));
}

#[tokio::test]
async fn test_model_without_slide_is_bad_gateway() {
    let client = spawn_model("Sorry, I can only answer in prose.").await;
    let base = spawn_app(SlideSource::Model, Some(client)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "Why should I learn Rust?" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(error_message(response).await.contains("<slide>"));
}

#[tokio::test]
async fn test_model_malformed_slide_is_bad_gateway() {
    let client = spawn_model("<slide><bullet>x</bullet></slide>").await;
    let base = spawn_app(SlideSource::Model, Some(client)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "Why should I learn Rust?" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(error_message(response).await.contains("Could not parse XML content"));
}

#[tokio::test]
async fn test_unparsable_upload_is_bad_request() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let xml = "<presentation><slide><title>Broken</slide></presentation>";
    let form = Form::new().part("xml_file", Part::text(xml).file_name("broken.xml"));

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(response).await.contains("Could not parse XML content"));
}

#[tokio::test]
async fn test_model_not_configured() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .json(&json!({ "prompt": "Why should I learn Rust?", "source": "model" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_xml_upload() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let xml = "<presentation><slide><title>Uploaded</title>\
               <content><point>One</point><point>Two</point></content></slide></presentation>";
    let form = Form::new().part("xml_file", Part::text(xml).file_name("deck.xml"));

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let deck = read_deck(response).await;
    assert_eq!(deck.slides[0].title, "Uploaded");
    assert_eq!(deck.slides[0].bullets, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_upload_without_file() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let form = Form::new().text("comment", "nothing here");

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No file uploaded");
}

#[tokio::test]
async fn test_upload_without_filename() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let form = Form::new().text("xml_file", "<slide/>");

    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "No file selected");
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let response = reqwest::Client::new()
        .post(format!("{}/generate", base))
        .header("content-type", "text/plain")
        .body("Slide: Intro")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(!error_message(response).await.is_empty());
}

#[tokio::test]
async fn test_cors_preflight() {
    let base = spawn_app(SlideSource::Heuristic, None).await;
    let client = reqwest::Client::new();

    let allowed = client
        .request(reqwest::Method::OPTIONS, format!("{}/generate", base))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let denied = client
        .request(reqwest::Method::OPTIONS, format!("{}/generate", base))
        .header("origin", "http://evil.example")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
