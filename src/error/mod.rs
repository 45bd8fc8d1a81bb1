//! Error handling for the ChatEQT client.
//!
//! - **Categories**: coarse classification used for retry and hints
//! - **Domain errors**: network, stream, auth and system errors
//! - **Unified type**: `ChatError` wraps all of them, optionally with context
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Auth | Missing or rejected session | No |
//! | Server | Backend errors (5xx) | Yes |
//! | Client | Bad requests | No |
//! | User | Quota, bad input | No |
//! | System | Filesystem errors | No |

mod auth;
mod category;
mod chat_error;
mod context;
mod network;
mod result;
mod stream;
mod system;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use context::ErrorContext;
pub use network::NetworkError;
pub use result::{ChatResult, ResultExt};
pub use stream::StreamError;
pub use system::{classify_io_error, SystemError};
