//! Rendering a failed command for the terminal.

use std::error::Error as StdError;

use color_eyre::Report;
use tracing::debug;

use crate::error::{AuthError, ChatError, NetworkError, StreamError, SystemError};

/// Message for a command that failed, followed by what to try next.
///
/// Domain errors anywhere in the chain are shown through their user
/// message and recovery hint. Anything else falls back to the report text.
pub fn describe_error(report: &Report) -> String {
    for cause in report.chain() {
        if let Some(err) = cause.downcast_ref::<ChatError>() {
            return describe_chat_error(err);
        }
        if let Some(err) = as_chat_error(cause) {
            return describe_chat_error(&err);
        }
    }
    report.to_string()
}

fn as_chat_error(cause: &(dyn StdError + 'static)) -> Option<ChatError> {
    if let Some(err) = cause.downcast_ref::<NetworkError>() {
        Some(err.clone().into())
    } else if let Some(err) = cause.downcast_ref::<StreamError>() {
        Some(err.clone().into())
    } else if let Some(err) = cause.downcast_ref::<AuthError>() {
        Some(err.clone().into())
    } else {
        cause
            .downcast_ref::<SystemError>()
            .map(|err| err.clone().into())
    }
}

fn describe_chat_error(err: &ChatError) -> String {
    debug!(
        code = err.error_code(),
        category = %err.category(),
        retryable = err.is_retryable(),
        context = %err.context().map(|c| c.to_log_string()).unwrap_or_default(),
        "Command failed: {}",
        err
    );
    format!("{}\n{}", err.user_message(), err.recovery_hint())
}
