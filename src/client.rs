//! ChatEQT API client.
//!
//! Streaming chat and conversation CRUD go to the API base; usage and
//! login/signup go to the website base.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::auth::{extract_session_token, session_cookie, AuthRequest, AuthResponse, AuthSession};
use crate::config::ClientConfig;
use crate::error::{AuthError, ChatResult, NetworkError, StreamError};
use crate::models::{
    ChatRequest, Conversation, ConversationDetail, ConversationEnvelope,
    ConversationListResponse, CreateConversationRequest, UsageData,
};
use crate::sse::{drive_chunked, drive_cumulative, report_failure, ChatStreamHandler};
use crate::traits::{Headers, HttpClient, HttpError, Response, ResponseBody};

const LOGIN_FALLBACK: &str = "Login failed";
const SIGNUP_FALLBACK: &str = "Signup failed";

/// `{"error": "..."}` body of a rejected auth request.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    error: Option<String>,
}

/// Client for the ChatEQT backend, generic over its transport.
///
/// # Example
///
/// ```ignore
/// use chateqt::client::ChatClient;
/// use chateqt::config::ClientConfig;
/// use chateqt::models::ChatRequest;
/// use chateqt::sse::ChatStreamCallbacks;
///
/// let client = ChatClient::new(ClientConfig::from_env())?;
/// let mut callbacks = ChatStreamCallbacks::new().with_delta(|text| print!("{}", text));
/// client
///     .stream_chat(&ChatRequest::new("What moved rates today?"), "me@fund.com", &mut callbacks)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient<C: HttpClient = ReqwestHttpClient> {
    http: C,
    config: ClientConfig,
}

impl ChatClient<ReqwestHttpClient> {
    /// Client over reqwest, configured from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self::with_http_client(http, config))
    }
}

impl<C: HttpClient> ChatClient<C> {
    pub fn with_http_client(http: C, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn api_headers(&self, email: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("X-API-Key".to_string(), self.config.api_key.clone());
        headers.insert("X-User-Email".to_string(), email.to_string());
        headers
    }

    /// Stream an answer into `handler`.
    ///
    /// Any failure (request build, transport, non-2xx status, missing body,
    /// interrupted read) is reported to `handler.on_error` exactly once and
    /// also returned. Dropping the returned future stops all dispatch.
    pub async fn stream_chat<H>(
        &self,
        request: &ChatRequest,
        email: &str,
        handler: &mut H,
    ) -> Result<(), StreamError>
    where
        H: ChatStreamHandler + ?Sized,
    {
        let url = self.config.api_endpoint("/chat");
        let body = match serde_json::to_string(request) {
            Ok(body) => body,
            Err(e) => {
                let err = StreamError::InvalidRequest {
                    message: e.to_string(),
                };
                return Err(report_failure(handler, err));
            }
        };

        let mut headers = self.api_headers(email);
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        info!(
            conversation_id = request.conversation_id.as_deref().unwrap_or("new"),
            history = request.messages.len(),
            "Starting chat stream"
        );

        let response = match self.http.post_stream(&url, &body, &headers).await {
            Ok(response) => response,
            Err(e) => return Err(report_failure(handler, StreamError::from(e))),
        };

        if !response.is_success() {
            let err = StreamError::Status {
                status: response.status,
            };
            return Err(report_failure(handler, err));
        }

        match response.body {
            None => Err(report_failure(handler, StreamError::NoBody)),
            Some(ResponseBody::Chunked(chunks)) => drive_chunked(chunks, handler).await,
            Some(ResponseBody::Cumulative(snapshots)) => {
                drive_cumulative(snapshots, handler).await
            }
        }
    }

    /// `GET /conversations`
    pub async fn list_conversations(&self, email: &str) -> Result<Vec<Conversation>, NetworkError> {
        let url = self.config.api_endpoint("/conversations");
        let response = self.http.get(&url, &self.api_headers(email)).await;
        let list: ConversationListResponse = parse_json(ensure_success(response, &url)?)?;
        debug!(count = list.conversations.len(), "Listed conversations");
        Ok(list.conversations)
    }

    /// `GET /conversations/{id}`
    pub async fn get_conversation(
        &self,
        id: &str,
        email: &str,
    ) -> Result<ConversationDetail, NetworkError> {
        let url = self.config.api_endpoint(&format!("/conversations/{}", id));
        let response = self.http.get(&url, &self.api_headers(email)).await;
        parse_json(ensure_success(response, &url)?)
    }

    /// `POST /conversations`
    pub async fn create_conversation(
        &self,
        email: &str,
        title: Option<&str>,
    ) -> Result<Conversation, NetworkError> {
        let url = self.config.api_endpoint("/conversations");
        let body = serde_json::to_string(&CreateConversationRequest {
            title: title.map(str::to_string),
        })?;
        let response = self.http.post(&url, &body, &self.api_headers(email)).await;
        let envelope: ConversationEnvelope = parse_json(ensure_success(response, &url)?)?;
        Ok(envelope.conversation)
    }

    /// `DELETE /conversations/{id}`
    pub async fn delete_conversation(&self, id: &str, email: &str) -> Result<(), NetworkError> {
        let url = self.config.api_endpoint(&format!("/conversations/{}", id));
        let response = self.http.delete(&url, &self.api_headers(email)).await;
        ensure_success(response, &url)?;
        Ok(())
    }

    /// `GET {site}/api/chat/usage`, authenticated by the session cookie.
    pub async fn fetch_usage(&self, token: &str) -> Result<UsageData, NetworkError> {
        let url = self.config.site_endpoint("/api/chat/usage");
        let mut headers = Headers::new();
        headers.insert("Cookie".to_string(), session_cookie(token));
        let response = self.http.get(&url, &headers).await;
        parse_json(ensure_success(response, &url)?)
    }

    /// `POST {site}/api/auth/login`
    pub async fn login(&self, email: &str, password: &str) -> ChatResult<AuthSession> {
        let request = AuthRequest {
            email,
            password,
            name: None,
        };
        self.authenticate("/api/auth/login", &request, |message| AuthError::LoginFailed {
            message: message.unwrap_or_else(|| LOGIN_FALLBACK.to_string()),
        })
        .await
    }

    /// `POST {site}/api/auth/signup`
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> ChatResult<AuthSession> {
        let request = AuthRequest {
            email,
            password,
            name,
        };
        self.authenticate("/api/auth/signup", &request, |message| AuthError::SignupFailed {
            message: message.unwrap_or_else(|| SIGNUP_FALLBACK.to_string()),
        })
        .await
    }

    async fn authenticate<F>(
        &self,
        path: &str,
        request: &AuthRequest<'_>,
        rejected: F,
    ) -> ChatResult<AuthSession>
    where
        F: FnOnce(Option<String>) -> AuthError,
    {
        let url = self.config.site_endpoint(path);
        let body = serde_json::to_string(request).map_err(NetworkError::from)?;
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = self
            .http
            .post(&url, &body, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))?;

        if !response.is_success() {
            let message = response
                .json::<AuthErrorBody>()
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty());
            debug!(status = response.status, "Auth request rejected");
            return Err(rejected(message).into());
        }

        let AuthResponse { user } = response.json().map_err(NetworkError::from)?;
        let token = response.header("set-cookie").and_then(extract_session_token);
        info!(email = %user.email, has_token = token.is_some(), "Authenticated");
        Ok(AuthSession { user, token })
    }
}

/// Map a transport error or non-2xx reply to a [`NetworkError`].
fn ensure_success(
    response: Result<Response, HttpError>,
    url: &str,
) -> Result<Response, NetworkError> {
    let response = response.map_err(|e| NetworkError::from_http(e, url))?;
    if response.is_success() {
        Ok(response)
    } else {
        Err(NetworkError::HttpStatus {
            status: response.status,
            message: response.text().unwrap_or_default(),
        })
    }
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, NetworkError> {
    Ok(response.json()?)
}
