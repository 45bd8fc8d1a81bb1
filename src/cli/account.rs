//! `login`, `signup`, `logout` and `usage`.

use std::io::Write;

use color_eyre::Result;
use tracing::warn;

use super::CliContext;
use crate::auth::{AuthSession, Credentials};
use crate::error::{AuthError, ErrorContext, ResultExt};
use crate::traits::{CredentialsProvider, HttpClient};

/// Read a password from the terminal without echo.
pub fn prompt_password() -> std::io::Result<String> {
    rpassword::prompt_password("Password: ")
}

pub async fn login<C, P, W>(
    ctx: &CliContext<C, P>,
    email: &str,
    password: &str,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let session = ctx
        .client
        .login(email, password)
        .await
        .context(ErrorContext::new("log in"))?;
    store_session(ctx, &session, out).await
}

pub async fn signup<C, P, W>(
    ctx: &CliContext<C, P>,
    email: &str,
    password: &str,
    name: Option<&str>,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let session = ctx
        .client
        .signup(email, password, name)
        .await
        .context(ErrorContext::new("sign up"))?;
    store_session(ctx, &session, out).await
}

async fn store_session<C, P, W>(
    ctx: &CliContext<C, P>,
    session: &AuthSession,
    out: &mut W,
) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    if session.token.is_none() {
        warn!("Server set no session cookie; usage checks will be skipped");
    }
    ctx.store
        .save(&Credentials::from_session(session))
        .await
        .context(ErrorContext::new("save the session"))?;
    writeln!(
        out,
        "Logged in as {} ({} plan)",
        session.user.display_name(),
        session.user.plan
    )?;
    Ok(())
}

pub async fn logout<C, P, W>(ctx: &CliContext<C, P>, out: &mut W) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    ctx.store
        .clear()
        .await
        .context(ErrorContext::new("clear the session"))?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

pub async fn usage<C, P, W>(ctx: &CliContext<C, P>, out: &mut W) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let (creds, _) = ctx.require_session().await?;
    let token = creds.token.as_deref().ok_or(AuthError::NotAuthenticated)?;
    let usage = ctx
        .client
        .fetch_usage(token)
        .await
        .context(ErrorContext::new("check usage"))?;

    writeln!(out, "Plan: {}", usage.plan)?;
    writeln!(out, "Used: {} of {}", usage.used, usage.limit)?;
    writeln!(out, "Remaining: {}", usage.remaining.max(0))?;
    if usage.payment_failed == Some(true) {
        let note = if usage.grace_period == Some(true) {
            "Payment failed; your plan is in its grace period."
        } else {
            "Payment failed."
        };
        writeln!(out, "{}", note)?;
    }
    if usage.is_exhausted() {
        let limit = AuthError::UsageLimitReached {
            used: usage.used,
            limit: usage.limit,
        };
        writeln!(out, "{}", limit.user_message())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::client::ChatClient;
    use crate::config::ClientConfig;
    use crate::traits::{Headers, Response};
    use bytes::Bytes;

    fn ctx(
        mock: &MockHttpClient,
        store: &InMemoryCredentials,
    ) -> CliContext<MockHttpClient, InMemoryCredentials> {
        CliContext::new(
            ChatClient::with_http_client(mock.clone(), ClientConfig::new()),
            store.clone(),
        )
    }

    #[tokio::test]
    async fn test_login_stores_session() {
        let mock = MockHttpClient::new();
        let mut headers = Headers::new();
        headers.insert(
            "set-cookie".to_string(),
            "chateqt_token=tok123; Path=/; HttpOnly".to_string(),
        );
        mock.set_default_response(MockResponse::Success(Response::with_headers(
            200,
            headers,
            Bytes::from(r#"{"user":{"id":7,"email":"a@b.c","name":"Ada","plan":"free"}}"#),
        )));
        let store = InMemoryCredentials::new();

        let mut out = Vec::new();
        login(&ctx(&mock, &store), "a@b.c", "pw", &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Logged in as Ada (free plan)\n");

        let saved = store.get_credentials().unwrap();
        assert_eq!(saved.token.as_deref(), Some("tok123"));
        assert_eq!(saved.email(), Some("a@b.c"));
        assert!(saved.saved_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_store_untouched() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            401,
            Bytes::from(r#"{"error":"Invalid credentials"}"#),
        )));
        let store = InMemoryCredentials::new();

        let mut out = Vec::new();
        let err = login(&ctx(&mock, &store), "a@b.c", "bad", &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials (log in)");
        assert!(store.get_credentials().is_none());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears() {
        let mock = MockHttpClient::new();
        let store = InMemoryCredentials::with_credentials(Credentials {
            token: Some("t".to_string()),
            ..Default::default()
        });
        let mut out = Vec::new();
        logout(&ctx(&mock, &store), &mut out).await.unwrap();
        assert!(store.get_credentials().is_none());
    }

    #[tokio::test]
    async fn test_usage_report() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"{"used":10,"limit":10,"remaining":0,"plan":"free"}"#),
        )));
        let store = InMemoryCredentials::with_credentials(Credentials {
            token: Some("t".to_string()),
            user: Some(crate::auth::AuthUser {
                id: "1".to_string(),
                email: "a@b.c".to_string(),
                name: None,
                plan: "free".to_string(),
            }),
            saved_at: None,
        });

        let mut out = Vec::new();
        usage(&ctx(&mock, &store), &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Used: 10 of 10"));
        assert!(out.contains("Remaining: 0"));
        assert!(out.contains("Upgrade your plan"));
    }
}
