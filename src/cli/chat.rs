//! `chateqt chat`: ask a question and stream the answer.

use std::io;

use color_eyre::Result;
use tracing::{info, warn};

use super::args::ChatArgs;
use super::output::{JsonLinesPrinter, TranscriptPrinter};
use super::CliContext;
use crate::client::ChatClient;
use crate::error::{AuthError, ChatResult, ErrorContext, ResultExt};
use crate::models::ChatRequest;
use crate::sse::ChatStreamHandler;
use crate::traits::{CredentialsProvider, HttpClient};

/// How a stream ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed,
    Cancelled,
}

pub async fn run_chat<C, P>(ctx: &CliContext<C, P>, args: &ChatArgs) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
{
    let (request, email) = prepare_request(ctx, args).await?;

    if args.json {
        let mut printer = JsonLinesPrinter::new(io::stdout());
        let outcome = stream_until_interrupted(&ctx.client, &request, &email, &mut printer).await;
        printer.finish()?;
        outcome?;
    } else {
        let mut printer = TranscriptPrinter::new(io::stdout(), io::stderr());
        let outcome = stream_until_interrupted(&ctx.client, &request, &email, &mut printer).await;
        printer.finish()?;
        if outcome? == StreamOutcome::Cancelled {
            eprintln!("Cancelled.");
        }
    }
    Ok(())
}

/// Build the request and resolve the sender's email.
///
/// Exhausted free accounts are refused here. When continuing a conversation
/// its stored messages are attached as history.
pub async fn prepare_request<C, P>(
    ctx: &CliContext<C, P>,
    args: &ChatArgs,
) -> ChatResult<(ChatRequest, String)>
where
    C: HttpClient,
    P: CredentialsProvider,
{
    let (creds, email) = ctx.require_session().await?;

    if let Some(token) = creds.token.as_deref() {
        match ctx.client.fetch_usage(token).await {
            Ok(usage) if usage.is_exhausted() => {
                return Err(AuthError::UsageLimitReached {
                    used: usage.used,
                    limit: usage.limit,
                }
                .into());
            }
            Ok(_) => {}
            // The backend enforces the limit too.
            Err(e) => warn!("Usage check failed: {}", e),
        }
    }

    let mut request = ChatRequest::new(args.query.as_str());
    if let Some(id) = &args.conversation_id {
        let detail = ctx
            .client
            .get_conversation(id, &email)
            .await
            .with_context(|| ErrorContext::new("load history").with_conversation_id(id))?;
        info!(conversation_id = %id, messages = detail.messages.len(), "Continuing conversation");
        request = request
            .with_conversation_id(id.as_str())
            .with_history(&detail.messages);
    }
    Ok((request, email))
}

/// Stream into `handler` until the answer ends or Ctrl-C arrives.
///
/// On Ctrl-C the in-flight request future is dropped, so the handler sees
/// nothing further.
pub async fn stream_until_interrupted<C, H>(
    client: &ChatClient<C>,
    request: &ChatRequest,
    email: &str,
    handler: &mut H,
) -> ChatResult<StreamOutcome>
where
    C: HttpClient,
    H: ChatStreamHandler + ?Sized,
{
    tokio::select! {
        result = client.stream_chat(request, email, handler) => {
            result.with_context(|| {
                let ctx = ErrorContext::new("stream the answer");
                match &request.conversation_id {
                    Some(id) => ctx.with_conversation_id(id),
                    None => ctx,
                }
            })?;
            Ok(StreamOutcome::Completed)
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Chat stream cancelled");
            Ok(StreamOutcome::Cancelled)
        }
    }
}
