//! # StudHelper State
//!
//! Client-side state for StudHelper: the auth, class and UI stores, the
//! facades presentation code talks to, the route guard, durable key-value
//! storage and layered settings.
//!
//! Everything hangs off an [`AppContext`]. Store state sits behind locks
//! that are never held across an `.await`; each store exposes a
//! `subscribe()` channel that ticks on every mutation.

mod context;
mod error;
mod facades;
mod navigation;
mod sequencer;
mod settings;
mod storage;
mod stores;

pub use context::AppContext;
pub use error::{StoreError, StoreResult};
pub use facades::{
    AuthFacade, ClassesFacade, FileUploadFacade, UiFacade, UploadOutcome, UploadState,
    UploadTarget,
};
pub use navigation::{resolve_route, Route};
pub use sequencer::{RequestSequencer, Ticket};
pub use settings::{Settings, SettingsError};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, StorageError, SELECTED_CLASS_KEY, TOKEN_KEY,
};
pub use stores::{
    AuthStore, ClassStore, QueueEntry, SubmitSummary, UiState, UiStore, UploadQueue, VIDEO_TYPE,
};
