use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single citation attached to an answer.
///
/// Only the commonly rendered fields are typed; everything else the backend
/// sends is kept in `extra` so the object survives a round trip unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_firm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Citation {
    /// Best available label: title, then url, then firm.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.url.as_deref())
            .or(self.source_firm.as_deref())
            .unwrap_or("(untitled)")
    }
}

/// Citation bundle sent with an answer: research corpus hits and web hits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sources {
    #[serde(default)]
    pub research: Vec<Citation>,
    #[serde(default)]
    pub web: Vec<Citation>,
}

impl Sources {
    pub fn is_empty(&self) -> bool {
        self.research.is_empty() && self.web.is_empty()
    }

    pub fn len(&self) -> usize {
        self.research.len() + self.web.len()
    }
}
