//! # State Stores
//!
//! Each store owns the canonical copy of one domain's state. Action
//! methods are the only mutation path; every mutation bumps the store's
//! revision so subscribers can re-read.
//!
//! - [`AuthStore`] - session token and user profile
//! - [`ClassStore`] - classes, selection, chat sessions, upload queue
//! - [`UiStore`] - modal, slide-out and sidebar state

mod auth;
mod classes;
mod queue;
mod ui;

pub use auth::AuthStore;
pub use classes::{ClassStore, SubmitSummary};
pub use queue::{QueueEntry, UploadQueue, VIDEO_TYPE};
pub use ui::{UiState, UiStore};

use std::sync::atomic::{AtomicU32, Ordering};

use tokio::sync::watch;

/// Change counter observed by subscribers.
#[derive(Debug)]
pub(crate) struct Revision(watch::Sender<u64>);

impl Revision {
    pub(crate) fn new() -> Self {
        Self(watch::Sender::new(0))
    }

    pub(crate) fn bump(&self) {
        self.0.send_modify(|r| *r += 1);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<u64> {
        self.0.subscribe()
    }
}

/// Number of in-flight actions; loading while non-zero.
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicU32);

impl InFlight {
    pub(crate) fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    /// Marks an action in flight until the guard drops.
    pub(crate) fn enter<'a>(&'a self, revision: &'a Revision) -> InFlightGuard<'a> {
        self.0.fetch_add(1, Ordering::SeqCst);
        revision.bump();
        InFlightGuard {
            counter: self,
            revision,
        }
    }
}

pub(crate) struct InFlightGuard<'a> {
    counter: &'a InFlight,
    revision: &'a Revision,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counter.0.fetch_sub(1, Ordering::SeqCst);
        self.revision.bump();
    }
}
