//! Frame encoding used by the relay.

use crate::{DATA_PREFIX, FRAME_SEPARATOR};
use serde_json::json;

/// Encode one text delta as `data: {"text": ...}\n\n`.
pub fn encode_text_frame(text: &str) -> String {
    format!("{} {}{}", DATA_PREFIX, json!({ "text": text }), FRAME_SEPARATOR)
}

/// Encode a terminal error as `data: {"error": ...}\n\n`.
pub fn encode_error_frame(message: &str) -> String {
    format!("{} {}{}", DATA_PREFIX, json!({ "error": message }), FRAME_SEPARATOR)
}
