//! Events pushed by the chat stream endpoint.
//!
//! Each server-push message carries one JSON object discriminated by its
//! `type` field:
//!
//! | `type`      | Payload                     | Terminal |
//! |-------------|-----------------------------|----------|
//! | `connected` | -                           | no       |
//! | `chunk`     | `content`: text fragment    | no       |
//! | `done`      | -                           | yes      |
//! | `error`     | `message` or `error`        | yes      |

use crate::core::error::DomainError;
use serde::Deserialize;
use serde_json::{Value, json};

/// One decoded message from the chat stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Acknowledgement that the stream is open.
    Connected,
    /// An incremental fragment of the answer.
    Chunk(String),
    /// The answer is complete.
    Done,
    /// The backend gave up on this answer.
    Error(String),
}

/// Fields other than `type` are kept loose so an oddly shaped field never
/// hides which event this is.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Text carried by a loose field: the string itself, an object's own
/// `message`, or the compact JSON of anything else.
fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Object(ref fields) => match fields.get("message") {
            Some(Value::String(text)) => Some(text.clone()),
            _ => Some(value.to_string()),
        },
        other => Some(other.to_string()),
    }
}

impl ChatEvent {
    /// Decode one `data` payload.
    ///
    /// Invalid JSON, a missing `type`, or an unknown `type` all yield
    /// [`DomainError::MalformedEvent`].
    pub fn parse(data: &str) -> Result<Self, DomainError> {
        let raw: RawEvent =
            serde_json::from_str(data).map_err(|e| DomainError::MalformedEvent {
                reason: e.to_string(),
                raw: data.to_string(),
            })?;

        match raw.kind.as_str() {
            "connected" => Ok(ChatEvent::Connected),
            "chunk" => Ok(ChatEvent::Chunk(
                raw.content.and_then(text_of).unwrap_or_default(),
            )),
            "done" => Ok(ChatEvent::Done),
            "error" => Ok(ChatEvent::Error(
                raw.message
                    .and_then(text_of)
                    .or_else(|| raw.error.and_then(text_of))
                    .unwrap_or_else(|| "unknown upstream error".to_string()),
            )),
            other => Err(DomainError::MalformedEvent {
                reason: format!("unknown event type '{other}'"),
                raw: data.to_string(),
            }),
        }
    }

    /// Encode as the JSON payload the stream endpoint sends.
    pub fn to_payload(&self) -> String {
        let value = match self {
            ChatEvent::Connected => json!({ "type": "connected" }),
            ChatEvent::Chunk(content) => json!({ "type": "chunk", "content": content }),
            ChatEvent::Done => json!({ "type": "done" }),
            ChatEvent::Error(message) => json!({ "type": "error", "message": message }),
        };
        value.to_string()
    }

    /// Returns true if this event closes the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::Done | ChatEvent::Error(_))
    }
}
