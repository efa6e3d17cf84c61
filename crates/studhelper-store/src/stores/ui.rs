//! UI store: which modal and slide-out are open, and the sidebar state.
//!
//! Ephemeral; nothing here is persisted.

use parking_lot::RwLock;
use studhelper_types::{ModalName, Overlay, SlideOutName};
use tokio::sync::watch;

use super::Revision;

/// Overlay and sidebar state.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub active_modal: Option<Overlay<ModalName>>,
    pub active_slide_out: Option<Overlay<SlideOutName>>,
    pub sidebar_expanded: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_modal: None,
            active_slide_out: None,
            sidebar_expanded: true,
        }
    }
}

/// At most one modal and one slide-out are open at a time.
#[derive(Debug)]
pub struct UiStore {
    state: RwLock<UiState>,
    revision: Revision,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(UiState::default()),
            revision: Revision::new(),
        }
    }

    /// Snapshot of the whole state.
    #[must_use]
    pub fn state(&self) -> UiState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn active_modal(&self) -> Option<Overlay<ModalName>> {
        self.state.read().active_modal.clone()
    }

    #[must_use]
    pub fn active_slide_out(&self) -> Option<Overlay<SlideOutName>> {
        self.state.read().active_slide_out.clone()
    }

    #[must_use]
    pub fn sidebar_expanded(&self) -> bool {
        self.state.read().sidebar_expanded
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Opens a modal, replacing any open one.
    pub fn open_modal(&self, name: ModalName, props: serde_json::Value) {
        tracing::debug!(modal = %name, "Opening modal");
        self.update(|s| s.active_modal = Some(Overlay::new(name, props)));
    }

    pub fn close_modal(&self) {
        self.update(|s| s.active_modal = None);
    }

    /// Opens a slide-out panel, replacing any open one.
    pub fn open_slide_out(&self, name: SlideOutName, props: serde_json::Value) {
        tracing::debug!(panel = %name, "Opening slide-out");
        self.update(|s| s.active_slide_out = Some(Overlay::new(name, props)));
    }

    pub fn close_slide_out(&self) {
        self.update(|s| s.active_slide_out = None);
    }

    pub fn toggle_sidebar(&self) {
        self.update(|s| s.sidebar_expanded = !s.sidebar_expanded);
    }

    /// Closes everything and expands the sidebar.
    pub fn reset(&self) {
        self.update(|s| *s = UiState::default());
    }

    fn update(&self, f: impl FnOnce(&mut UiState)) {
        f(&mut self.state.write());
        self.revision.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let ui = UiStore::new();
        assert!(ui.active_modal().is_none());
        assert!(ui.active_slide_out().is_none());
        assert!(ui.sidebar_expanded());
    }

    #[test]
    fn test_open_modal_replaces_previous() {
        let ui = UiStore::new();
        ui.open_modal(ModalName::CreateClass, serde_json::Value::Null);
        ui.open_modal(ModalName::ClassSettings, json!({"classId": 5}));

        let modal = ui.active_modal().unwrap();
        assert_eq!(modal.name, ModalName::ClassSettings);
        assert_eq!(modal.props["classId"], 5);

        ui.close_modal();
        assert!(ui.active_modal().is_none());
    }

    #[test]
    fn test_null_props_become_empty_object() {
        let ui = UiStore::new();
        ui.open_slide_out(SlideOutName::QuickUsage, serde_json::Value::Null);
        assert_eq!(ui.active_slide_out().unwrap().props, json!({}));
    }

    #[test]
    fn test_modal_and_slide_out_are_independent() {
        let ui = UiStore::new();
        ui.open_modal(ModalName::DocumentUpload, json!({}));
        ui.open_slide_out(SlideOutName::ClassInfo, json!({}));
        ui.close_slide_out();

        assert!(ui.active_modal().is_some());
        assert!(ui.active_slide_out().is_none());
    }

    #[test]
    fn test_toggle_and_reset() {
        let ui = UiStore::new();
        let rx = ui.subscribe();

        ui.toggle_sidebar();
        assert!(!ui.sidebar_expanded());
        ui.open_modal(ModalName::CreateClass, json!({}));

        ui.reset();
        assert_eq!(ui.state(), UiState::default());
        assert_eq!(*rx.borrow(), 3);
    }
}
