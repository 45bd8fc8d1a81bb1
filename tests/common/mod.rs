//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chateqt::auth::{AuthUser, Credentials};
use chateqt::error::StreamError;
use chateqt::models::Sources;
use chateqt::sse::{ChatEvent, ChatStreamHandler};
use serde_json::Value;

/// The canonical answer stream: status, two deltas, done.
pub const ANSWER_STREAM: &str = "event: status\n\
data: {\"stage\":\"searching_corpus\"}\n\
\n\
event: delta\n\
data: {\"text\":\"Hello\"}\n\
\n\
event: delta\n\
data: {\"text\":\" world\"}\n\
\n\
event: done\n\
data: {\"conversation_id\":\"abc123\"}\n\
\n";

/// What [`ANSWER_STREAM`] decodes to.
pub fn answer_events() -> Vec<ChatEvent> {
    vec![
        ChatEvent::Status {
            stage: "searching_corpus".to_string(),
            data: serde_json::json!({"stage": "searching_corpus"}),
        },
        ChatEvent::Delta {
            text: "Hello".to_string(),
        },
        ChatEvent::Delta {
            text: " world".to_string(),
        },
        ChatEvent::Done {
            conversation_id: Some("abc123".to_string()),
        },
    ]
}

/// Handler that records everything it is given.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<ChatEvent>,
    pub errors: Vec<StreamError>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Delta { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ChatStreamHandler for Recorder {
    fn on_status(&mut self, stage: &str, data: &Value) {
        self.events.push(ChatEvent::Status {
            stage: stage.to_string(),
            data: data.clone(),
        });
    }

    fn on_delta(&mut self, text: &str) {
        self.events.push(ChatEvent::Delta {
            text: text.to_string(),
        });
    }

    fn on_sources(&mut self, sources: &Sources) {
        self.events.push(ChatEvent::Sources(sources.clone()));
    }

    fn on_suggestions(&mut self, prompts: &[String]) {
        self.events.push(ChatEvent::Suggestions {
            prompts: prompts.to_vec(),
        });
    }

    fn on_done(&mut self, conversation_id: Option<&str>) {
        self.events.push(ChatEvent::Done {
            conversation_id: conversation_id.map(str::to_string),
        });
    }

    fn on_error(&mut self, error: &StreamError) {
        self.errors.push(error.clone());
    }
}

pub fn test_user() -> AuthUser {
    AuthUser {
        id: "u-1".to_string(),
        email: "analyst@fund.com".to_string(),
        name: Some("Analyst".to_string()),
        plan: "pro".to_string(),
    }
}

pub fn test_credentials() -> Credentials {
    Credentials {
        token: Some("test-session-token".to_string()),
        user: Some(test_user()),
        saved_at: Some(chrono::Utc::now()),
    }
}
