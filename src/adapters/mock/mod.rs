//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`InMemoryCredentials`] - In-memory credential storage

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
