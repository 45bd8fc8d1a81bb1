use serde::{Deserialize, Serialize};

/// Plan name of the metered tier
const FREE_PLAN: &str = "free";

/// Query quota reported by `GET /api/chat/usage`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageData {
    pub used: i64,
    pub limit: i64,
    pub remaining: i64,
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_failed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period: Option<bool>,
}

impl UsageData {
    /// Free plan with no queries left.
    pub fn is_exhausted(&self) -> bool {
        self.plan == FREE_PLAN && self.remaining <= 0
    }
}
