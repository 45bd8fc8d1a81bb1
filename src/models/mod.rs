//! Data types exchanged with the ChatEQT backend.

mod conversation;
mod request;
mod source;
mod usage;

pub use conversation::{Conversation, ConversationDetail, Message, MessageRole};
pub(crate) use conversation::{ConversationEnvelope, ConversationListResponse};
pub use request::{ChatRequest, CreateConversationRequest, HistoryMessage};
pub use source::{Citation, Sources};
pub use usage::UsageData;

use serde::{Deserialize, Deserializer};

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Helper to deserialize nullable strings as empty string
/// Handles both missing fields and explicit null values
pub(crate) fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct IdHolder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_nullable_string")]
        title: String,
    }

    #[test]
    fn test_deserialize_id_accepts_string_and_integer() {
        let a: IdHolder = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(a.id, "abc");

        let b: IdHolder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(b.id, "42");
    }

    #[test]
    fn test_deserialize_nullable_string() {
        let a: IdHolder = serde_json::from_str(r#"{"id": "1", "title": null}"#).unwrap();
        assert_eq!(a.title, "");

        let b: IdHolder = serde_json::from_str(r#"{"id": "1"}"#).unwrap();
        assert_eq!(b.title, "");
    }
}
