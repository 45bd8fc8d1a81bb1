//! Status and delta event parsers

use serde_json::Value;

use crate::sse::events::ChatEvent;

/// Stage defaults to empty; the whole payload is kept for extra fields.
pub(super) fn parse_status_event(value: Value) -> ChatEvent {
    let stage = value
        .get("stage")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    ChatEvent::Status { stage, data: value }
}

pub(super) fn parse_delta_event(value: &Value) -> ChatEvent {
    let text = value
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    ChatEvent::Delta { text }
}
