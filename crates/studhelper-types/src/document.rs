//! Document types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Server-assigned document identifier.
pub type DocumentId = u64;

/// Lifecycle status of a document inside the upload queue.
///
/// Documents loaded from the server are always [`DocumentStatus::Existing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Staged locally, not yet sent.
    New,
    /// Existing document whose description was edited.
    Modified,
    /// Existing document marked for deletion.
    Deleted,
    /// Unchanged server document.
    #[default]
    Existing,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Existing => "existing",
        };
        f.write_str(s)
    }
}

/// Key of an upload-queue entry.
///
/// New entries get a local random key; entries staged from the server
/// reuse the document ID so callers can address them by `doc.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKey {
    Local(Uuid),
    Document(DocumentId),
}

impl EntryKey {
    /// Generates a fresh local key.
    #[must_use]
    pub fn local() -> Self {
        Self::Local(Uuid::new_v4())
    }
}

impl From<DocumentId> for EntryKey {
    fn from(id: DocumentId) -> Self {
        Self::Document(id)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => write!(f, "local:{id}"),
            Self::Document(id) => write!(f, "doc:{id}"),
        }
    }
}

/// A document attached to a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DocumentWire")]
pub struct DocumentRecord {
    pub id: DocumentId,
    /// Display filename (the name the file was uploaded with).
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, or `youtube` for video references.
    #[serde(rename = "type")]
    pub doc_type: String,
    pub description: Option<String>,
    /// Source URL for external video references.
    pub url: Option<String>,
    pub status: DocumentStatus,
    /// Server-side processing state (`pending`, `completed`, `failed`, ...).
    pub processing_status: Option<String>,
}

impl DocumentRecord {
    /// Returns true if this record points at an external video.
    #[must_use]
    pub fn is_video(&self) -> bool {
        self.url.is_some()
    }
}

/// Accepts both the server's document summary and the record's own
/// serialized form.
#[derive(Deserialize)]
struct DocumentWire {
    id: DocumentId,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    original_filename: Option<String>,
    #[serde(default, alias = "file_size")]
    size: u64,
    #[serde(default, rename = "type", alias = "file_type")]
    doc_type: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<DocumentStatus>,
    #[serde(default)]
    processing_status: Option<String>,
}

impl From<DocumentWire> for DocumentRecord {
    fn from(wire: DocumentWire) -> Self {
        Self {
            id: wire.id,
            filename: wire.original_filename.unwrap_or(wire.filename),
            size: wire.size,
            doc_type: wire.doc_type,
            description: wire.description,
            url: wire.url,
            status: wire.status.unwrap_or_default(),
            processing_status: wire.processing_status,
        }
    }
}
