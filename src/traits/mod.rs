//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, DELETE, streaming)
//! - [`CredentialsProvider`] - session storage and retrieval

pub mod credentials;
pub mod http;

pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{
    header_value, ByteStream, Headers, HttpClient, HttpError, Response, ResponseBody,
    StreamingResponse,
};
