//! HTTP client trait abstraction.
//!
//! The chat client talks to the backend only through [`HttpClient`], so tests
//! can substitute a scripted transport for the reqwest one.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Body of a streaming response, one item per read.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Look a header up ignoring the case of its name.
pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// How a streaming body is handed over.
///
/// - `Chunked`: each item holds only the bytes that arrived since the
///   previous item.
/// - `Cumulative`: each item holds the whole body received so far. Items
///   never shrink.
pub enum ResponseBody {
    Chunked(ByteStream),
    Cumulative(ByteStream),
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Chunked(_) => write!(f, "ResponseBody::Chunked(..)"),
            ResponseBody::Cumulative(_) => write!(f, "ResponseBody::Cumulative(..)"),
        }
    }
}

/// Response of a streaming request, before its body is read.
#[derive(Debug)]
pub struct StreamingResponse {
    pub status: u16,
    pub headers: Headers,
    /// `None` when the server sent nothing readable.
    pub body: Option<ResponseBody>,
}

impl StreamingResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timeout: {0}")]
    Timeout(String),
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },
    #[error("Request cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Trait for HTTP client operations.
///
/// `get`, `post` and `delete` buffer the whole body and return it whatever the
/// status; callers decide what a non-2xx means. `post_stream` returns as soon
/// as headers arrive.
///
/// # Example
///
/// ```ignore
/// use chateqt::traits::{HttpClient, Headers, HttpError};
///
/// async fn fetch_usage<C: HttpClient>(client: &C) -> Result<String, HttpError> {
///     let response = client.get("https://chateqt.com/api/chat/usage", &Headers::new()).await?;
///     response.text().map_err(|e| HttpError::Other(e.to_string()))
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request.
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request with a string body.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a DELETE request.
    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// Perform a POST request and return the body as a stream.
    ///
    /// Non-2xx statuses are returned as a normal [`StreamingResponse`]; only
    /// failures to get a response at all are errors.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError>;
}
