//! Client configuration.
//!
//! Defaults point at the production backend. Every field can be overridden
//! with a `with_*` builder or through `CHATEQT_*` environment variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://chateqt.com/api/v1";
pub const DEFAULT_SITE_URL: &str = "https://chateqt.com";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_URL: &str = "CHATEQT_API_URL";
pub const ENV_SITE_URL: &str = "CHATEQT_SITE_URL";
pub const ENV_API_KEY: &str = "CHATEQT_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "CHATEQT_TIMEOUT_SECS";
pub const ENV_BODY_MODE: &str = "CHATEQT_BODY_MODE";

/// How the transport hands a streaming body to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// One item per network read.
    #[default]
    Chunked,
    /// Each item is the whole body received so far.
    Cumulative,
}

impl FromStr for BodyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chunked" => Ok(BodyMode::Chunked),
            "cumulative" => Ok(BodyMode::Cumulative),
            other => Err(format!(
                "unknown body mode '{}', expected 'chunked' or 'cumulative'",
                other
            )),
        }
    }
}

impl fmt::Display for BodyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyMode::Chunked => write!(f, "chunked"),
            BodyMode::Cumulative => write!(f, "cumulative"),
        }
    }
}

/// Configuration for [`ChatClient`](crate::client::ChatClient).
///
/// # Example
///
/// ```ignore
/// use chateqt::config::{BodyMode, ClientConfig};
///
/// let config = ClientConfig::from_env()
///     .with_body_mode(BodyMode::Cumulative)
///     .with_timeout(std::time::Duration::from_secs(120));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base of the chat API (`/chat`, `/conversations`)
    pub api_url: String,
    /// Base of the website API (`/api/auth/*`, `/api/chat/usage`)
    pub site_url: String,
    /// Sent as `X-API-Key`; empty when not configured
    pub api_key: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. `None` lets long answers stream indefinitely.
    pub timeout: Option<Duration>,
    pub body_mode: BodyMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            api_key: String::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            body_mode: BodyMode::Chunked,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CHATEQT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    /// Unparseable values are logged and skipped.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_API_URL) {
            config = config.with_api_url(url);
        }
        if let Some(url) = get(ENV_SITE_URL) {
            config = config.with_site_url(url);
        }
        if let Some(key) = get(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(_) => warn!("Ignoring {}={:?}: not a number of seconds", ENV_TIMEOUT_SECS, raw),
            }
        }
        if let Some(raw) = get(ENV_BODY_MODE) {
            match raw.parse() {
                Ok(mode) => config.body_mode = mode,
                Err(e) => warn!("Ignoring {}: {}", ENV_BODY_MODE, e),
            }
        }

        config
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_base(url.into());
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = trim_base(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_body_mode(mut self, mode: BodyMode) -> Self {
        self.body_mode = mode;
        self
    }

    /// `{api_url}{path}`; `path` starts with `/`.
    pub fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// `{site_url}{path}`; `path` starts with `/`.
    pub fn site_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "https://chateqt.com/api/v1");
        assert_eq!(config.site_url, "https://chateqt.com");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.timeout, None);
        assert_eq!(config.body_mode, BodyMode::Chunked);
    }

    #[test]
    fn test_builders_trim_trailing_slash() {
        let config = ClientConfig::new()
            .with_api_url("http://localhost:9000/api/v1/")
            .with_site_url("http://localhost:3000//");
        assert_eq!(config.api_endpoint("/chat"), "http://localhost:9000/api/v1/chat");
        assert_eq!(
            config.site_endpoint("/api/chat/usage"),
            "http://localhost:3000/api/chat/usage"
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:1/api/v1/"),
            (ENV_API_KEY, "secret"),
            (ENV_TIMEOUT_SECS, "90"),
            (ENV_BODY_MODE, "Cumulative"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_url, "http://127.0.0.1:1/api/v1");
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.body_mode, BodyMode::Cumulative);
    }

    #[test]
    fn test_from_lookup_skips_bad_values() {
        let config = ClientConfig::from_lookup(|k| match k {
            ENV_TIMEOUT_SECS => Some("soon".to_string()),
            ENV_BODY_MODE => Some("sometimes".to_string()),
            ENV_API_URL => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_body_mode_parse_and_display() {
        assert_eq!("chunked".parse::<BodyMode>(), Ok(BodyMode::Chunked));
        assert_eq!(" CUMULATIVE ".parse::<BodyMode>(), Ok(BodyMode::Cumulative));
        assert!("sse".parse::<BodyMode>().is_err());
        assert_eq!(BodyMode::Cumulative.to_string(), "cumulative");
    }
}
