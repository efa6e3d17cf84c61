//! UI facade.

use studhelper_types::{ModalName, Overlay, SlideOutName};

use crate::context::AppContext;

/// Overlay and sidebar views and actions.
pub struct UiFacade<'a> {
    ctx: &'a AppContext,
}

impl<'a> UiFacade<'a> {
    pub(crate) fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn active_modal(&self) -> Option<Overlay<ModalName>> {
        self.ctx.ui().active_modal()
    }

    #[must_use]
    pub fn active_slide_out(&self) -> Option<Overlay<SlideOutName>> {
        self.ctx.ui().active_slide_out()
    }

    #[must_use]
    pub fn sidebar_expanded(&self) -> bool {
        self.ctx.ui().sidebar_expanded()
    }

    /// Opens a modal; pass `Value::Null` for no props.
    pub fn open_modal(&self, name: ModalName, props: serde_json::Value) {
        self.ctx.ui().open_modal(name, props);
    }

    pub fn close_modal(&self) {
        self.ctx.ui().close_modal();
    }

    /// Opens a slide-out; pass `Value::Null` for no props.
    pub fn open_slide_out(&self, name: SlideOutName, props: serde_json::Value) {
        self.ctx.ui().open_slide_out(name, props);
    }

    pub fn close_slide_out(&self) {
        self.ctx.ui().close_slide_out();
    }

    pub fn toggle_sidebar(&self) {
        self.ctx.ui().toggle_sidebar();
    }
}
