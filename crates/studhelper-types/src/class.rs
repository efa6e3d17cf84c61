//! Class types.

use serde::{Deserialize, Serialize};

use crate::document::DocumentRecord;

/// Server-assigned class identifier.
pub type ClassId = u64;

/// A class the authenticated user belongs to.
///
/// List responses omit `documents`; detail responses include them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Join code shared with other students.
    #[serde(rename = "class_code", alias = "code", default)]
    pub code: String,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub document_count: u32,
    #[serde(default)]
    pub chat_session_count: u32,
}

impl ClassRecord {
    /// Finds a document of this class by ID.
    #[must_use]
    pub fn document(&self, id: u64) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.id == id)
    }
}

/// Partial update for `PUT /classes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClassPatch {
    /// Applies the patch to a record in place.
    pub fn apply_to(&self, record: &mut ClassRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// A class membership with its permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub user_id: u64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub is_manager: bool,
    #[serde(default)]
    pub can_read: bool,
    #[serde(default)]
    pub can_chat: bool,
    #[serde(default)]
    pub can_upload_documents: bool,
    #[serde(default)]
    pub is_sponsored: bool,
}
