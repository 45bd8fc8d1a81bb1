//! Chat stream event types.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::Sources;

/// One dispatched record of the chat stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Pipeline progress. `data` is the whole payload, for extra fields.
    Status { stage: String, data: Value },
    /// Answer text to append.
    Delta { text: String },
    /// Citations backing the answer.
    Sources(Sources),
    /// Follow-up prompts.
    Suggestions { prompts: Vec<String> },
    /// Terminal record.
    Done { conversation_id: Option<String> },
}

impl ChatEvent {
    /// Returns the wire event name.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ChatEvent::Status { .. } => "status",
            ChatEvent::Delta { .. } => "delta",
            ChatEvent::Sources(_) => "sources",
            ChatEvent::Suggestions { .. } => "suggestions",
            ChatEvent::Done { .. } => "done",
        }
    }
}

/// One classified SSE line.
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// `event: <name>`
    Event(String),
    /// `data: <payload>`
    Data(String),
    /// Blank line
    Empty,
    /// Line starting with `:`
    Comment(String),
    /// Anything else, including `event:`/`data:` without the space
    Other(String),
}

/// Why a single record was dropped. Never fatal to the stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SseParseError {
    #[error("Unknown SSE event type: {0:?}")]
    UnknownEventType(String),
    #[error("Invalid JSON in {event_type} event: {reason}")]
    InvalidJson { event_type: String, reason: String },
    #[error("Malformed {event_type} payload: {message}")]
    MalformedPayload { event_type: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_names() {
        assert_eq!(
            ChatEvent::Delta {
                text: String::new()
            }
            .event_type_name(),
            "delta"
        );
        assert_eq!(
            ChatEvent::Sources(Sources::default()).event_type_name(),
            "sources"
        );
        assert_eq!(
            ChatEvent::Done {
                conversation_id: None
            }
            .event_type_name(),
            "done"
        );
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let event = ChatEvent::Delta {
            text: "Hi".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "delta", "text": "Hi"})
        );

        let event = ChatEvent::Sources(Sources::default());
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "sources", "research": [], "web": []})
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = SseParseError::UnknownEventType("ping".to_string());
        assert_eq!(err.to_string(), "Unknown SSE event type: \"ping\"");

        let err = SseParseError::InvalidJson {
            event_type: "delta".to_string(),
            reason: "EOF while parsing".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid JSON in delta event: EOF while parsing"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}
