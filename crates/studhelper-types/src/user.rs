//! User and session types.

use serde::{Deserialize, Serialize};

/// A user profile as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-assigned user ID.
    pub id: u64,
    /// Email address.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation timestamp (ISO 8601, as sent by the server).
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Fields that can be changed through `PUT /auth/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// The authenticated session.
///
/// A session is authenticated only when both the token and the user
/// profile are present. A token alone means the profile still has to be
/// re-hydrated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token.
    pub token: Option<String>,
    /// The signed-in user's profile.
    pub user: Option<UserProfile>,
}

impl Session {
    /// Returns true when both token and user are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Clears token and user.
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}

/// Role of a member inside a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Reader,
    Contributor,
    Manager,
    Owner,
}
