use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string, Sources};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A conversation as listed by `GET /conversations`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Untitled conversations come back with a null title
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored message within a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    /// Citations attached to assistant answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Sources>,
    pub created_at: DateTime<Utc>,
}

/// Response of `GET /conversations/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// `{"conversations": [...]}`
#[derive(Debug, Deserialize)]
pub(crate) struct ConversationListResponse {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// `{"conversation": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ConversationEnvelope {
    pub conversation: Conversation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_conversation() {
        let json = r#"{
            "id": "c1",
            "title": "Rate outlook",
            "created_at": "2026-01-20T00:00:00Z",
            "updated_at": "2026-01-21T08:30:00Z"
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.id, "c1");
        assert_eq!(conv.title, "Rate outlook");
        assert!(conv.updated_at > conv.created_at);
    }

    #[test]
    fn test_deserialize_conversation_with_null_title() {
        let json = r#"{
            "id": 7,
            "title": null,
            "created_at": "2026-01-20T00:00:00Z",
            "updated_at": "2026-01-20T00:00:00Z"
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.id, "7");
        assert_eq!(conv.title, "");
    }

    #[test]
    fn test_deserialize_detail_with_sources() {
        let json = r#"{
            "conversation": {
                "id": "c1",
                "title": "t",
                "created_at": "2026-01-20T00:00:00Z",
                "updated_at": "2026-01-20T00:00:00Z"
            },
            "messages": [
                {"id": "m1", "role": "user", "content": "hi", "created_at": "2026-01-20T00:00:01Z"},
                {
                    "id": "m2",
                    "role": "assistant",
                    "content": "hello",
                    "sources": {"research": [{"title": "Q3 note", "source_firm": "Acme"}], "web": []},
                    "created_at": "2026-01-20T00:00:02Z"
                }
            ]
        }"#;
        let detail: ConversationDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.messages.len(), 2);
        assert_eq!(detail.messages[0].role, MessageRole::User);
        let sources = detail.messages[1].sources.as_ref().unwrap();
        assert_eq!(sources.research[0].source_firm.as_deref(), Some("Acme"));
        assert!(sources.web.is_empty());
    }

    #[test]
    fn test_message_role_as_str() {
        assert_eq!(MessageRole::User.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
    }
}
