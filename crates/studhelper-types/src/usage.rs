//! Token usage types.

use serde::{Deserialize, Serialize};

/// Token usage and limits over the three accounting windows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub daily_tokens_used: u64,
    pub weekly_tokens_used: u64,
    pub monthly_tokens_used: u64,
    pub daily_limit: u64,
    pub weekly_limit: u64,
    pub monthly_limit: u64,
    pub daily_remaining: u64,
    pub weekly_remaining: u64,
    pub monthly_remaining: u64,
}

/// Per-member usage line in a class overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassUsageOverview {
    pub user_id: u64,
    pub username: String,
    pub usage_stats: UsageStats,
    #[serde(default)]
    pub is_sponsored: bool,
    #[serde(default)]
    pub last_activity: Option<String>,
}
