//! Login/signup results and session cookie handling.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::deserialize_id;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "chateqt_token";

// Repeated `Set-Cookie` headers arrive joined with ", ".
static SESSION_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"chateqt_token=([^;,\s]+)").expect("valid session cookie regex"));

/// Account returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub plan: String,
}

impl AuthUser {
    /// Name if set, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Outcome of a successful login or signup.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: AuthUser,
    /// Token from `Set-Cookie`; absent if the server set none.
    pub token: Option<String>,
}

/// Body of `POST /api/auth/login` and `/signup`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    pub user: AuthUser,
}

/// Pull the session token out of a `Set-Cookie` header value.
pub fn extract_session_token(set_cookie: &str) -> Option<String> {
    SESSION_TOKEN_RE
        .captures(set_cookie)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// `Cookie` header value for authenticated site requests.
pub fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE, token)
}
