//! `history`, `show`, `new` and `delete`.

use std::io::Write;

use color_eyre::Result;

use super::CliContext;
use crate::error::{ErrorContext, ResultExt};
use crate::models::{Conversation, ConversationDetail};
use crate::traits::{CredentialsProvider, HttpClient};

const UNTITLED: &str = "(untitled)";

fn title_of(conversation: &Conversation) -> &str {
    if conversation.title.trim().is_empty() {
        UNTITLED
    } else {
        &conversation.title
    }
}

pub async fn list<C, P, W>(ctx: &CliContext<C, P>, out: &mut W) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let (_, email) = ctx.require_session().await?;
    let mut conversations = ctx
        .client
        .list_conversations(&email)
        .await
        .context(ErrorContext::new("list conversations"))?;
    if conversations.is_empty() {
        writeln!(out, "No conversations yet.")?;
        return Ok(());
    }

    conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    for conversation in &conversations {
        writeln!(
            out,
            "{}  {}  {}",
            conversation.id,
            conversation.updated_at.format("%Y-%m-%d %H:%M"),
            title_of(conversation)
        )?;
    }
    Ok(())
}

pub async fn show<C, P, W>(ctx: &CliContext<C, P>, id: &str, out: &mut W) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let (_, email) = ctx.require_session().await?;
    let detail = ctx
        .client
        .get_conversation(id, &email)
        .await
        .with_context(|| ErrorContext::new("open").with_conversation_id(id))?;
    write_transcript(out, &detail)?;
    Ok(())
}

fn write_transcript<W: Write>(out: &mut W, detail: &ConversationDetail) -> std::io::Result<()> {
    writeln!(out, "# {}", title_of(&detail.conversation))?;
    for message in &detail.messages {
        writeln!(out, "\n[{}]", message.role.as_str())?;
        writeln!(out, "{}", message.content)?;
        if let Some(sources) = message.sources.as_ref().filter(|s| !s.is_empty()) {
            for citation in sources.research.iter().chain(&sources.web) {
                writeln!(out, "  - {}", citation.label())?;
            }
        }
    }
    Ok(())
}

pub async fn create<C, P, W>(ctx: &CliContext<C, P>, title: Option<&str>, out: &mut W) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let (_, email) = ctx.require_session().await?;
    let conversation = ctx
        .client
        .create_conversation(&email, title)
        .await
        .context(ErrorContext::new("create a conversation"))?;
    writeln!(out, "{}  {}", conversation.id, title_of(&conversation))?;
    Ok(())
}

pub async fn delete<C, P, W>(ctx: &CliContext<C, P>, id: &str, out: &mut W) -> Result<()>
where
    C: HttpClient,
    P: CredentialsProvider,
    W: Write,
{
    let (_, email) = ctx.require_session().await?;
    ctx.client
        .delete_conversation(id, &email)
        .await
        .with_context(|| ErrorContext::new("delete").with_conversation_id(id))?;
    writeln!(out, "Deleted {}", id)?;
    Ok(())
}
