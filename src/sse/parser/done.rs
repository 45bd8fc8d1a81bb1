//! Terminal event parser

use serde_json::Value;

use crate::sse::events::ChatEvent;

/// The backend has used both spellings; snake_case wins when both appear.
pub(super) fn parse_done_event(value: &Value) -> ChatEvent {
    let conversation_id = ["conversation_id", "conversationId"]
        .iter()
        .find_map(|key| value.get(*key).and_then(id_to_string));
    ChatEvent::Done { conversation_id }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
