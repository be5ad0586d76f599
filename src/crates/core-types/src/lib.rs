//! PaddockPal shared wire types.
//!
//! Both the chat client and the relay serialize these, so field names are the
//! wire contract: `{ model, contents: [{ role, parts: [{ text }] }] }` outbound
//! and `{ text }` / `{ error }` per relayed frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model used when neither the caller nor the relay config names one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Role tag on the outbound payload for user content.
pub const USER_ROLE: &str = "user";

/// Who authored a turn in the conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// One message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// Single user turn addressed to `model`.
    pub fn user_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: vec![Content {
                role: USER_ROLE.to_string(),
                parts: vec![Part { text: text.into() }],
            }],
        }
    }

    /// Text of the first part of the first content entry, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|content| content.parts.first())
            .map(|part| part.text.as_str())
    }
}

/// Decoded body of one relayed frame.
///
/// `error` is kept as a raw JSON value: upstreams send either a bare string or
/// an object with a `message` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl FramePayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: None,
            error: Some(Value::String(message.into())),
        }
    }

    /// Human-readable message for the error field, if it carries one.
    ///
    /// A string is used as-is and an object's string `message` wins. Anything
    /// else falls back to its compact JSON form. Falsy values (`null`, `false`,
    /// `0`, `""`) mean no error.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(message) if message.is_empty() => None,
            Value::String(message) => Some(message.clone()),
            other => Some(
                other
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            ),
        }
    }
}
