//! SSE line classification and record dispatch.

mod content;
mod done;
mod sources;

use serde_json::Value;
use tracing::debug;

use crate::sse::events::{ChatEvent, SseLine, SseParseError};

use content::{parse_delta_event, parse_status_event};
use done::parse_done_event;
use sources::{parse_sources_event, parse_suggestions_event};

const EVENT_PREFIX: &str = "event: ";
const DATA_PREFIX: &str = "data: ";

/// Classify one complete line. Prefixes must match exactly, space included.
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix(EVENT_PREFIX) {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix(':') {
        return SseLine::Comment(rest.trim().to_string());
    }

    SseLine::Other(line.to_string())
}

/// Turn an event name and its raw `data:` payload into a typed event.
pub fn parse_chat_event(event_type: &str, data: &str) -> Result<ChatEvent, SseParseError> {
    let value: Value = serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson {
        event_type: event_type.to_string(),
        reason: e.to_string(),
    })?;

    match event_type {
        "status" => Ok(parse_status_event(value)),
        "delta" => Ok(parse_delta_event(&value)),
        "sources" => parse_sources_event(value),
        "suggestions" => Ok(parse_suggestions_event(&value)),
        "done" => Ok(parse_done_event(&value)),
        other => Err(SseParseError::UnknownEventType(other.to_string())),
    }
}

/// Pairs `event:` lines with the `data:` line that follows them.
///
/// The pending name is cleared after every `data:` line, so each data line
/// needs its own `event:` line.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    current_event: String,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one complete line. Returns the event it completes, if any.
    pub fn dispatch_line(&mut self, line: &str) -> Option<ChatEvent> {
        match parse_sse_line(line) {
            SseLine::Event(name) => {
                self.current_event = name;
                None
            }
            SseLine::Data(data) => {
                let event_type = std::mem::take(&mut self.current_event);
                match parse_chat_event(&event_type, &data) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        debug!("Dropping SSE record: {}", e);
                        None
                    }
                }
            }
            SseLine::Empty | SseLine::Comment(_) | SseLine::Other(_) => None,
        }
    }

    /// Name set by the last `event:` line and not yet consumed.
    pub fn current_event(&self) -> &str {
        &self.current_event
    }

    pub fn reset(&mut self) {
        self.current_event.clear();
    }
}
