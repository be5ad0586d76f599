pub mod generate;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// Fallback for paths the static directory cannot serve.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "File not found" })))
}
