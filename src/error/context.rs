//! Error context for enriched error information.

use std::fmt;

use chrono::{DateTime, Utc};

/// Where an error happened, attached for logs and the final report.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Human-readable description of the operation that failed.
    pub operation: String,

    /// Conversation the operation was working on, if any.
    pub conversation_id: Option<String>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            conversation_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];
        if let Some(ref id) = self.conversation_id {
            parts.push(format!("conversation_id={}", id));
        }
        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));
        parts.join(" ")
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.conversation_id {
            Some(ref id) => write!(f, "{} in conversation {}", self.operation, id),
            None => write!(f, "{}", self.operation),
        }
    }
}
