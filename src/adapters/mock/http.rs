//! Mock HTTP client for testing.
//!
//! Responses are scripted per URL; every request is recorded for later
//! assertions.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{
    ByteStream, Headers, HttpClient, HttpError, Response, ResponseBody, StreamingResponse,
};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST or DELETE)
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        crate::traits::header_value(&self.headers, name)
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Buffered response, for `get`/`post`/`delete`
    Success(Response),
    /// Fail before any response
    Error(HttpError),
    /// 200 with a chunked body
    Stream(Vec<Bytes>),
    /// 200 with the same chunks delivered as cumulative snapshots
    CumulativeStream(Vec<Bytes>),
    /// 200 whose body fails with `error` after `chunks`
    InterruptedStream { chunks: Vec<Bytes>, error: HttpError },
    /// 200 whose body yields `chunks` and then never ends
    StalledStream(Vec<Bytes>),
    /// Streaming response without a body
    EmptyStream { status: u16 },
    /// Streaming response with an arbitrary status and a chunked body
    StreamStatus { status: u16, body: Vec<Bytes> },
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use chateqt::adapters::mock::{MockHttpClient, MockResponse};
/// use chateqt::traits::{HttpClient, Response, Headers};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "https://chateqt.com/api/v1/conversations",
///     MockResponse::Success(Response::new(200, Bytes::from(r#"{"conversations":[]}"#))),
/// );
///
/// let response = client.get("https://chateqt.com/api/v1/conversations", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Longer registered prefixes win over shorter
    /// ones when no exact match exists.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let by_prefix = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if by_prefix.is_some() {
            return by_prefix;
        }

        self.default_response.lock().unwrap().clone()
    }

    fn buffered(&self, url: &str) -> Result<Response, HttpError> {
        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

fn chunked(chunks: Vec<Bytes>) -> ByteStream {
    Box::pin(stream::iter(chunks.into_iter().map(Ok)))
}

fn cumulative(chunks: Vec<Bytes>) -> ByteStream {
    let mut received = Vec::new();
    let snapshots: Vec<Result<Bytes, HttpError>> = chunks
        .into_iter()
        .map(|chunk| {
            received.extend_from_slice(&chunk);
            Ok(Bytes::from(received.clone()))
        })
        .collect();
    Box::pin(stream::iter(snapshots))
}

fn ok_stream(body: ResponseBody) -> StreamingResponse {
    StreamingResponse {
        status: 200,
        headers: Headers::new(),
        body: Some(body),
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.buffered(url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.buffered(url)
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("DELETE", url, headers, None);
        self.buffered(url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(ok_stream(ResponseBody::Chunked(chunked(chunks))))
            }
            Some(MockResponse::CumulativeStream(chunks)) => {
                Ok(ok_stream(ResponseBody::Cumulative(cumulative(chunks))))
            }
            Some(MockResponse::InterruptedStream { chunks, error }) => {
                let items = chunks.into_iter().map(Ok).chain(std::iter::once(Err(error)));
                Ok(ok_stream(ResponseBody::Chunked(Box::pin(stream::iter(items)))))
            }
            Some(MockResponse::StalledStream(chunks)) => {
                let items = stream::iter(chunks.into_iter().map(Ok)).chain(stream::pending());
                Ok(ok_stream(ResponseBody::Chunked(Box::pin(items))))
            }
            Some(MockResponse::EmptyStream { status }) => Ok(StreamingResponse {
                status,
                headers: Headers::new(),
                body: None,
            }),
            Some(MockResponse::StreamStatus { status, body }) => Ok(StreamingResponse {
                status,
                headers: Headers::new(),
                body: Some(ResponseBody::Chunked(chunked(body))),
            }),
            Some(MockResponse::Success(response)) => Ok(StreamingResponse {
                status: response.status,
                headers: response.headers,
                body: Some(ResponseBody::Chunked(chunked(vec![response.body]))),
            }),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(body: ResponseBody) -> Vec<Result<Bytes, HttpError>> {
        match body {
            ResponseBody::Chunked(s) | ResponseBody::Cumulative(s) => s.collect().await,
        }
    }

    #[tokio::test]
    async fn test_get_with_response_records_request() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/test",
            MockResponse::Success(Response::new(200, Bytes::from("Hello"))),
        );

        let mut headers = Headers::new();
        headers.insert("X-User-Email".to_string(), "a@b.c".to_string());
        let response = client.get("https://example.com/test", &headers).await.unwrap();

        assert_eq!(response.status, 200);
        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].header("x-user-email"), Some("a@b.c"));
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://x/api",
            MockResponse::Success(Response::new(200, Bytes::new())),
        );
        client.set_response(
            "https://x/api/conversations",
            MockResponse::Success(Response::new(201, Bytes::new())),
        );
        let response = client
            .delete("https://x/api/conversations/42", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_missing_response_is_error() {
        let client = MockHttpClient::new();
        assert!(client.get("https://nowhere", &Headers::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_cumulative_stream_snapshots() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::CumulativeStream(vec![
            Bytes::from("ab"),
            Bytes::from("cd"),
        ]));
        let response = client.post_stream("https://x", "{}", &Headers::new()).await.unwrap();
        let items = collect(response.body.unwrap()).await;
        let items: Vec<Bytes> = items.into_iter().map(Result::unwrap).collect();
        assert_eq!(items, vec![Bytes::from("ab"), Bytes::from("abcd")]);
    }

    #[tokio::test]
    async fn test_interrupted_stream_ends_with_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::InterruptedStream {
            chunks: vec![Bytes::from("ab")],
            error: HttpError::Io("reset".to_string()),
        });
        let response = client.post_stream("https://x", "{}", &Headers::new()).await.unwrap();
        let items = collect(response.body.unwrap()).await;
        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_empty_stream_has_no_body() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::EmptyStream { status: 200 });
        let response = client.post_stream("https://x", "{}", &Headers::new()).await.unwrap();
        assert!(response.is_success());
        assert!(response.body.is_none());
    }
}
