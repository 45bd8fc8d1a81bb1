//! Reqwest-based HTTP client adapter.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;

use crate::config::{BodyMode, ClientConfig};
use crate::traits::{
    ByteStream, Headers, HttpClient, HttpError, Response, ResponseBody, StreamingResponse,
};

/// HTTP client implementation using reqwest.
///
/// Streaming bodies are exposed either chunk by chunk or as cumulative
/// snapshots, depending on the configured [`BodyMode`].
///
/// # Example
///
/// ```ignore
/// use chateqt::adapters::ReqwestHttpClient;
/// use chateqt::config::ClientConfig;
/// use chateqt::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::from_config(&ClientConfig::from_env())?;
/// let response = client.get("https://chateqt.com/api/chat/usage", &Headers::new()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    body_mode: BodyMode,
}

impl ReqwestHttpClient {
    /// Build a client with the timeouts and body mode from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Self::convert_error)?;
        Ok(Self {
            client,
            body_mode: config.body_mode,
        })
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Errors raised while reading a body that has already started.
    fn convert_body_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Io(err.to_string())
        }
    }

    /// Repeated headers (e.g. several `Set-Cookie`) are joined with `", "`.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        let mut converted = Headers::new();
        for (name, value) in headers {
            let Ok(value) = value.to_str() else {
                continue;
            };
            converted
                .entry(name.to_string())
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        converted
    }

    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value))
    }

    async fn send(builder: reqwest::RequestBuilder) -> Result<Response, HttpError> {
        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_body_error)?;

        Ok(Response::with_headers(status, headers, body))
    }
}

/// Turn a chunk stream into a stream of everything received so far.
///
/// Each snapshot copies the whole body received so far, so a body of `n`
/// bytes costs O(n²) copying. Chunked mode avoids this.
fn accumulate(chunks: ByteStream) -> ByteStream {
    let snapshots = chunks.scan(BytesMut::new(), |received, chunk| {
        let item = chunk.map(|bytes| {
            received.extend_from_slice(&bytes);
            Bytes::copy_from_slice(received)
        });
        futures::future::ready(Some(item))
    });
    Box::pin(snapshots)
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        Self::send(Self::apply_headers(self.client.get(url), headers)).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        Self::send(Self::apply_headers(builder, headers)).await
    }

    async fn delete(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        Self::send(Self::apply_headers(self.client.delete(url), headers)).await
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamingResponse, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());

        // no body is readable for 204/304
        if status == 204 || status == 304 {
            return Ok(StreamingResponse {
                status,
                headers: response_headers,
                body: None,
            });
        }

        let chunks: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map(|result| result.map_err(Self::convert_body_error)),
        );
        let body = match self.body_mode {
            BodyMode::Chunked => ResponseBody::Chunked(chunks),
            BodyMode::Cumulative => ResponseBody::Cumulative(accumulate(chunks)),
        };

        Ok(StreamingResponse {
            status,
            headers: response_headers,
            body: Some(body),
        })
    }
}
