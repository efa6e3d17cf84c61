//! Common types used throughout the StudHelper client.
//!
//! This crate provides the domain records exchanged with the StudHelper
//! API and held by the client-side stores: sessions, classes, documents,
//! chat sessions, usage statistics and the fixed UI overlay names.

mod chat;
mod class;
mod document;
mod ui;
mod usage;
mod user;

pub use chat::{ChatMessage, ChatReply, ChatSession};
pub use class::{ClassId, ClassPatch, ClassRecord, Member};
pub use document::{DocumentId, DocumentRecord, DocumentStatus, EntryKey};
pub use ui::{ModalName, Overlay, SlideOutName};
pub use usage::{ClassUsageOverview, UsageStats};
pub use user::{ProfileUpdate, Session, UserProfile, UserRole};

/// Default API root used when no configuration overrides it.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
