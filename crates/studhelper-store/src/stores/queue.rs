//! Upload queue.
//!
//! Staging list for document changes made while creating or editing a
//! class. Entries are either new (a local file or video link not yet sent)
//! or staged copies of documents already on the server.
//!
//! Entry lifecycle:
//!
//! ```text
//! new      --remove-->  (gone)
//! existing --edit-->    modified --remove--> deleted
//! existing --remove-->  deleted
//! ```
//!
//! `deleted` is terminal until the queue is cleared.

use std::collections::BTreeMap;

use studhelper_client::{CreateClassData, UploadFile, VideoRef};
use studhelper_types::{DocumentId, DocumentRecord, DocumentStatus, EntryKey};

/// Document type recorded for video entries.
pub const VIDEO_TYPE: &str = "youtube";

/// One staged change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub key: EntryKey,
    pub filename: String,
    pub size: u64,
    pub doc_type: String,
    pub description: Option<String>,
    /// Description when the entry was staged from the server.
    pub original_description: Option<String>,
    pub url: Option<String>,
    pub status: DocumentStatus,
    /// File contents, for new file entries only.
    pub file: Option<UploadFile>,
}

impl QueueEntry {
    /// Server document ID, for entries staged from the server.
    #[must_use]
    pub fn document_id(&self) -> Option<DocumentId> {
        match self.key {
            EntryKey::Document(id) => Some(id),
            EntryKey::Local(_) => None,
        }
    }

    /// True if submitting this entry needs a request.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status != DocumentStatus::Existing
    }
}

/// The staging list itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadQueue {
    entries: Vec<QueueEntry>,
}

impl UploadQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Looks up an entry.
    #[must_use]
    pub fn get(&self, key: &EntryKey) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.key == *key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that submitting would send.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Stages a new local file.
    pub fn add_file(&mut self, file: UploadFile, description: Option<String>) -> EntryKey {
        let key = EntryKey::local();
        self.entries.push(QueueEntry {
            key,
            filename: file.filename.clone(),
            size: file.size(),
            doc_type: file.mime_type.clone(),
            description: normalize(description),
            original_description: None,
            url: None,
            status: DocumentStatus::New,
            file: Some(file),
        });
        key
    }

    /// Stages a new video link.
    pub fn add_video(&mut self, url: String, description: Option<String>) -> EntryKey {
        let key = EntryKey::local();
        self.entries.push(QueueEntry {
            key,
            filename: url.clone(),
            size: 0,
            doc_type: VIDEO_TYPE.to_string(),
            description: normalize(description),
            original_description: None,
            url: Some(url),
            status: DocumentStatus::New,
            file: None,
        });
        key
    }

    /// Stages a server document as `existing`.
    ///
    /// Staging the same document twice keeps the first entry.
    pub fn add_existing(&mut self, doc: &DocumentRecord) -> EntryKey {
        let key = EntryKey::Document(doc.id);
        if self.get(&key).is_none() {
            let description = normalize(doc.description.clone());
            self.entries.push(QueueEntry {
                key,
                filename: doc.filename.clone(),
                size: doc.size,
                doc_type: doc.doc_type.clone(),
                original_description: description.clone(),
                description,
                url: doc.url.clone(),
                status: DocumentStatus::Existing,
                file: None,
            });
        }
        key
    }

    /// Removes a new entry, or marks a server entry `deleted`.
    ///
    /// Returns false if no entry has this key.
    pub fn remove(&mut self, key: &EntryKey) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.key == *key) else {
            return false;
        };

        if self.entries[pos].status == DocumentStatus::New {
            self.entries.remove(pos);
        } else {
            self.entries[pos].status = DocumentStatus::Deleted;
        }
        true
    }

    /// Changes an entry's description.
    ///
    /// Server entries become `modified` when the description differs from
    /// the one captured at staging time, and return to `existing` when it
    /// is edited back. Deleted entries are left alone. Returns false if the
    /// entry is missing or deleted.
    pub fn update_description(&mut self, key: &EntryKey, description: Option<String>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == *key) else {
            return false;
        };

        let description = normalize(description);
        match entry.status {
            DocumentStatus::Deleted => return false,
            DocumentStatus::New => {}
            DocumentStatus::Existing | DocumentStatus::Modified => {
                entry.status = if description == entry.original_description {
                    DocumentStatus::Existing
                } else {
                    DocumentStatus::Modified
                };
            }
        }
        entry.description = description;
        true
    }

    /// Drops an entry unconditionally (after it was applied remotely).
    pub(crate) fn discard(&mut self, key: &EntryKey) {
        self.entries.retain(|e| e.key != *key);
    }

    /// Empties the queue.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Builds a class-creation payload from the new entries.
    ///
    /// Server entries are ignored; a class being created has none.
    #[must_use]
    pub fn to_create_data(&self, name: &str, description: Option<String>) -> CreateClassData {
        let mut data = CreateClassData::new(name);
        data.description = normalize(description);

        let mut file_descriptions = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.status == DocumentStatus::New) {
            if let Some(file) = &entry.file {
                if let Some(desc) = &entry.description {
                    file_descriptions.insert(file.filename.clone(), desc.clone());
                }
                data.files.push(file.clone());
            } else if let Some(url) = &entry.url {
                data.videos.push(VideoRef {
                    url: url.clone(),
                    description: entry.description.clone(),
                });
            }
        }
        data.file_descriptions = file_descriptions;
        data
    }
}

/// Blank descriptions are stored as absent.
fn normalize(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}
