//! File-upload facade.
//!
//! Validates files before sending them and tracks the state of the current
//! upload. Each facade instance has its own upload state.

use parking_lot::RwLock;
use studhelper_client::UploadFile;
use studhelper_types::{ClassId, DocumentRecord};
use studhelper_validation::validate_file_upload;

use crate::context::AppContext;
use crate::error::{StoreError, StoreResult};

/// Progress of the current upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub is_uploading: bool,
    /// 0 while running, 100 once the last upload succeeded.
    pub progress: u8,
    pub error: Option<String>,
}

/// Where an upload goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Class(ClassId),
    Session(u64),
}

/// Result of one file in [`FileUploadFacade::upload_many`].
#[derive(Debug)]
pub struct UploadOutcome {
    pub filename: String,
    pub result: StoreResult<DocumentRecord>,
}

/// Upload helper.
pub struct FileUploadFacade<'a> {
    ctx: &'a AppContext,
    state: RwLock<UploadState>,
}

impl<'a> FileUploadFacade<'a> {
    pub(crate) fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            state: RwLock::new(UploadState::default()),
        }
    }

    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state.read().clone()
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.state.read().is_uploading
    }

    #[must_use]
    pub fn progress(&self) -> u8 {
        self.state.read().progress
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Uploads a file to a class and refreshes the class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] without any request for oversized
    /// or unsupported files, or the upload error.
    pub async fn upload_class_document(
        &self,
        class_id: ClassId,
        file: UploadFile,
        description: Option<&str>,
    ) -> StoreResult<DocumentRecord> {
        self.validate(&file)?;
        self.begin();
        let result = self
            .ctx
            .classes()
            .upload_document(class_id, file, description)
            .await;
        self.finish(result)
    }

    /// Uploads a file scoped to one chat session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] without any request for oversized
    /// or unsupported files, or the upload error.
    pub async fn upload_chat_document(
        &self,
        session_id: u64,
        file: UploadFile,
    ) -> StoreResult<DocumentRecord> {
        self.validate(&file)?;
        self.begin();
        let result = self
            .ctx
            .api()
            .documents()
            .upload_to_session(session_id, file)
            .await
            .map_err(|e| StoreError::api(e, "Upload failed"));
        self.finish(result)
    }

    /// Uploads files one after another; a failure does not stop the rest.
    pub async fn upload_many(
        &self,
        target: UploadTarget,
        files: Vec<UploadFile>,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let filename = file.filename.clone();
            let result = match target {
                UploadTarget::Class(id) => self.upload_class_document(id, file, None).await,
                UploadTarget::Session(id) => self.upload_chat_document(id, file).await,
            };
            outcomes.push(UploadOutcome { filename, result });
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(total = outcomes.len(), failed, "Batch upload finished");
        outcomes
    }

    fn validate(&self, file: &UploadFile) -> StoreResult<()> {
        validate_file_upload(file.size(), &file.mime_type)
            .into_result()
            .map_err(|msg| {
                tracing::debug!(filename = %file.filename, reason = %msg, "Rejected upload");
                self.state.write().error = Some(msg.clone());
                StoreError::Validation(msg)
            })
    }

    fn begin(&self) {
        *self.state.write() = UploadState {
            is_uploading: true,
            progress: 0,
            error: None,
        };
    }

    fn finish(&self, result: StoreResult<DocumentRecord>) -> StoreResult<DocumentRecord> {
        let mut state = self.state.write();
        state.is_uploading = false;
        match &result {
            Ok(_) => state.progress = 100,
            Err(e) => state.error = Some(e.message()),
        }
        result
    }
}
