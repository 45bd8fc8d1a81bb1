//! Concrete implementations of the traits in `crate::traits`.
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCredentialsProvider`] - File-based credentials storage
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses
//! - [`mock::InMemoryCredentials`] - In-memory credential storage

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;

pub use file_credentials::FileCredentialsProvider;
pub use mock::{InMemoryCredentials, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
