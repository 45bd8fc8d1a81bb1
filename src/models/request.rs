use serde::{Deserialize, Serialize};

use super::{Message, MessageRole};

/// One prior turn sent along with a chat request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for HistoryMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub query: String,
    /// `null` starts a new conversation
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            conversation_id: None,
            messages: Vec::new(),
        }
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn with_history<'a, I>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = &'a Message>,
    {
        self.messages = messages.into_iter().map(HistoryMessage::from).collect();
        self
    }
}

/// Body of `POST /conversations`
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CreateConversationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
