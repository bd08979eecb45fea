//! Route handlers.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use deckgen_core::{parse_deck, Deck, Error, SlideSource};
use deckgen_pptx::{PptxWriter, CONTENT_TYPE_PPTX, DEFAULT_DECK_FILENAME};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Multipart field carrying an uploaded presentation XML file.
const UPLOAD_FIELD: &str = "xml_file";

/// JSON body of `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Slide Generator API is running"
    }))
}

/// Generate a deck from a JSON prompt or an uploaded XML file.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let deck = if content_type.starts_with("application/json") {
        let Json(body) = Json::<GenerateRequest>::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        draft_from_prompt(&state, body).await?
    } else if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        deck_from_upload(multipart).await?
    } else {
        return Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Send a JSON body with a prompt or a multipart form with an xml_file",
        ));
    };

    deck_response(&deck)
}

async fn draft_from_prompt(state: &AppState, body: GenerateRequest) -> Result<Deck, ApiError> {
    let source = match body.source.as_deref() {
        Some(name) => name.parse::<SlideSource>()?,
        None => state.default_source,
    };
    let prompt = body.prompt.unwrap_or_default();

    log::debug!("Drafting deck with {} source", source);
    let draft = deckgen_llm::draft(source, &prompt, state.client.as_ref())
        .await
        .map_err(|e| match source {
            SlideSource::Model => ApiError::from_model(e),
            SlideSource::Heuristic => e.into(),
        })?;

    Ok(draft.deck)
}

async fn deck_from_upload(mut multipart: Multipart) -> Result<Deck, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::bad_request("No file selected"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let xml = String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::MalformedXml("file is not valid UTF-8".to_string()))?;

        log::info!("Received XML upload {} ({} bytes)", file_name, xml.len());
        return Ok(parse_deck(&xml)?);
    }

    Err(ApiError::bad_request("No file uploaded"))
}

fn deck_response(deck: &Deck) -> Result<Response, ApiError> {
    let bytes = PptxWriter::new().write(deck)?;
    log::info!(
        "Generated deck with {} slide(s), {} bytes",
        deck.len(),
        bytes.len()
    );

    let headers = [
        (header::CONTENT_TYPE, CONTENT_TYPE_PPTX.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DEFAULT_DECK_FILENAME),
        ),
    ];
    Ok((headers, bytes).into_response())
}
