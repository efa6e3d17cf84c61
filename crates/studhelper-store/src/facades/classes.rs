//! Classes facade.

use studhelper_types::{ChatSession, ClassId, ClassPatch, ClassRecord};
use studhelper_validation::validate_class_name;

use crate::context::AppContext;
use crate::error::{StoreError, StoreResult};

/// Class views and actions.
pub struct ClassesFacade<'a> {
    ctx: &'a AppContext,
}

impl<'a> ClassesFacade<'a> {
    pub(crate) fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn classes(&self) -> Vec<ClassRecord> {
        self.ctx.classes().classes()
    }

    #[must_use]
    pub fn current_class(&self) -> Option<ClassRecord> {
        self.ctx.classes().current_class()
    }

    #[must_use]
    pub fn current_chat(&self) -> Option<ChatSession> {
        self.ctx.classes().current_chat()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.ctx.classes().is_loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.ctx.classes().error()
    }

    /// Reloads the class list.
    ///
    /// # Errors
    ///
    /// Returns the class store's error.
    pub async fn fetch_classes(&self) -> StoreResult<()> {
        self.ctx.classes().fetch_classes().await
    }

    /// Creates a class from the name, description and whatever is staged in
    /// the upload queue.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an invalid name, or the class
    /// store's error.
    pub async fn create_class(
        &self,
        name: &str,
        description: Option<String>,
    ) -> StoreResult<ClassRecord> {
        let name = name.trim();
        validate_class_name(name)
            .into_result()
            .map_err(StoreError::Validation)?;
        self.ctx
            .classes()
            .create_class_from_queue(name, description)
            .await
    }

    /// Renames and/or re-describes a class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an invalid new name, or the
    /// class store's error.
    pub async fn update_class(&self, id: ClassId, patch: ClassPatch) -> StoreResult<ClassRecord> {
        if let Some(name) = &patch.name {
            validate_class_name(name)
                .into_result()
                .map_err(StoreError::Validation)?;
        }
        self.ctx.classes().update_class(id, patch).await
    }

    /// Deletes a class.
    ///
    /// # Errors
    ///
    /// Returns the class store's error.
    pub async fn delete_class(&self, id: ClassId) -> StoreResult<()> {
        self.ctx.classes().delete_class(id).await
    }

    pub fn select_class(&self, id: ClassId) {
        self.ctx.classes().select_class(id);
    }

    pub fn select_chat(&self, id: Option<u64>) {
        self.ctx.classes().select_chat(id);
    }

    /// Joins a class by its code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a blank code, or the class
    /// store's error.
    pub async fn join_class(&self, class_code: &str) -> StoreResult<ClassRecord> {
        if class_code.trim().is_empty() {
            return Err(StoreError::Validation("Class code is required".to_string()));
        }
        self.ctx.classes().join_class(class_code).await
    }
}
