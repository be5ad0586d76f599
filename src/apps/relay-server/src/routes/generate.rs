//! `POST /api/generate`
//!
//! Wraps the user's text in the domain prompt, starts an upstream completion
//! and relays each piece as a `data: {"text": ...}` frame. Any upstream
//! failure, before or during streaming, becomes a single error frame.

use crate::prompt::build_prompt;
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use paddock_ai_adapters::TextStream;
use paddock_chat_stream::{encode_error_frame, encode_text_frame};
use serde_json::{json, Value};
use std::convert::Infallible;
use tracing::{debug, error, info, warn};

const MISSING_KEY_MESSAGE: &str = "API key is not configured";
const INVALID_CONTENTS_MESSAGE: &str =
    "Invalid request: contents field is required and must be an array";

pub async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(provider) = state.provider.clone() else {
        error!("Rejecting generate request: {}", MISSING_KEY_MESSAGE);
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY_MESSAGE);
    };

    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Request body is not JSON: {}", e);
            return json_error(StatusCode::BAD_REQUEST, INVALID_CONTENTS_MESSAGE);
        }
    };

    let contents = match request.get("contents") {
        Some(Value::Array(items)) if !items.is_empty() => Value::Array(items.clone()),
        _ => return json_error(StatusCode::BAD_REQUEST, INVALID_CONTENTS_MESSAGE),
    };

    let model = request
        .get("model")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .unwrap_or(state.config.default_model.as_str())
        .to_string();
    let message_text = extract_message_text(&contents);
    info!("Generate request: model={}, text_len={}", model, message_text.len());

    let prompt = build_prompt(&message_text);
    let frames: BoxStream<'static, Result<String, Infallible>> =
        match provider.stream_completion(&model, &prompt).await {
            Ok(pieces) => relay_frames(pieces).boxed(),
            Err(e) => {
                error!("Generation error: {:#}", e);
                stream::once(async move { Ok::<_, Infallible>(encode_error_frame(&e.to_string())) })
                    .boxed()
            }
        };

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

/// Text of `contents[0].parts[0].text`, or the serialized contents when the
/// entry has another shape.
fn extract_message_text(contents: &Value) -> String {
    contents
        .get(0)
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.get(0))
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| contents.to_string())
}

/// Encode provider pieces as frames, ending after the first error frame.
fn relay_frames(pieces: TextStream) -> impl futures_util::Stream<Item = Result<String, Infallible>> {
    stream::unfold(Some(pieces), |state| async move {
        let mut pieces = state?;
        loop {
            match pieces.next().await {
                Some(Ok(text)) if text.is_empty() => continue,
                Some(Ok(text)) => return Some((Ok(encode_text_frame(&text)), Some(pieces))),
                Some(Err(e)) => {
                    error!("Generation error: {:#}", e);
                    return Some((Ok(encode_error_frame(&e.to_string())), None));
                }
                None => {
                    debug!("Upstream completion finished");
                    return None;
                }
            }
        }
    })
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
