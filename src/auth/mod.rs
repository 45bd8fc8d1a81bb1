//! Session handling for the ChatEQT client.
//!
//! - Credentials storage (`~/.chateqt/credentials.json`)
//! - Auth endpoint payloads and session cookie extraction

pub mod credentials;
pub mod session;

pub use credentials::{Credentials, CredentialsManager};
pub(crate) use session::{AuthRequest, AuthResponse};
pub use session::{extract_session_token, session_cookie, AuthSession, AuthUser, SESSION_COOKIE};
