//! Chat session types.

use serde::{Deserialize, Serialize};

/// A chat session inside a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: u64,
    pub title: String,
    pub class_id: u64,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub message_count: u32,
}

/// A single message in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub session_id: u64,
    pub content: String,
    pub is_user: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub tokens_used: u64,
}

/// The pair of messages returned when sending to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub user_message: ChatMessage,
    pub ai_response: ChatMessage,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub response_time_ms: u64,
    #[serde(default)]
    pub context_provided: bool,
}
