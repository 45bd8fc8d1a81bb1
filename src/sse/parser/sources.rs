//! Sources and suggestions event parsers

use serde_json::Value;

use crate::models::Sources;
use crate::sse::events::{ChatEvent, SseParseError};

pub(super) fn parse_sources_event(value: Value) -> Result<ChatEvent, SseParseError> {
    serde_json::from_value::<Sources>(value)
        .map(ChatEvent::Sources)
        .map_err(|e| SseParseError::MalformedPayload {
            event_type: "sources".to_string(),
            message: e.to_string(),
        })
}

/// Missing `prompts` means no suggestions; non-string entries are skipped.
pub(super) fn parse_suggestions_event(value: &Value) -> ChatEvent {
    let prompts = value
        .get("prompts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    ChatEvent::Suggestions { prompts }
}
