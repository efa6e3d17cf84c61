//! Class store.
//!
//! Single source of truth for the signed-in user's classes, the selected
//! class and chat, the selected class's chat sessions, and the upload
//! queue used by the create and edit flows.
//!
//! Selection is stored as an ID and resolved against the collection on
//! every read, so the selected class can never drift from the collection.

use std::sync::Arc;

use parking_lot::RwLock;
use studhelper_client::{ApiClient, CreateClassData, UploadFile};
use studhelper_types::{
    ChatSession, ClassId, ClassPatch, ClassRecord, DocumentId, DocumentRecord, DocumentStatus,
    EntryKey,
};
use studhelper_validation::{validate_file_upload, validate_youtube_url};
use tokio::sync::watch;

use super::queue::{QueueEntry, UploadQueue};
use super::{InFlight, Revision};
use crate::error::{StoreError, StoreResult};
use crate::sequencer::RequestSequencer;
use crate::storage::{KeyValueStore, SELECTED_CLASS_KEY};

#[derive(Debug, Default)]
struct ClassState {
    classes: Vec<ClassRecord>,
    selected_class: Option<ClassId>,
    selected_chat: Option<u64>,
    chats: Vec<ChatSession>,
    queue: UploadQueue,
    error: Option<String>,
}

impl ClassState {
    fn find(&self, id: ClassId) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Replaces the entry with the same ID, or appends.
    fn upsert(&mut self, record: ClassRecord) {
        match self.classes.iter_mut().find(|c| c.id == record.id) {
            Some(existing) => *existing = record,
            None => self.classes.push(record),
        }
    }

    fn clear_selection(&mut self) {
        self.selected_class = None;
        self.selected_chat = None;
        self.chats.clear();
    }
}

/// Counts of requests sent by [`ClassStore::submit_upload_queue`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitSummary {
    pub uploaded: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Class and document state.
pub struct ClassStore {
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<ClassState>,
    list_requests: RequestSequencer,
    detail_requests: RequestSequencer<ClassId>,
    in_flight: InFlight,
    revision: Revision,
}

impl ClassStore {
    /// Creates an empty store.
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(ClassState::default()),
            list_requests: RequestSequencer::new(),
            detail_requests: RequestSequencer::new(),
            in_flight: InFlight::default(),
            revision: Revision::new(),
        }
    }

    // ==================== Views ====================

    /// All loaded classes.
    #[must_use]
    pub fn classes(&self) -> Vec<ClassRecord> {
        self.state.read().classes.clone()
    }

    /// A loaded class by ID.
    #[must_use]
    pub fn class(&self, id: ClassId) -> Option<ClassRecord> {
        self.state.read().find(id).cloned()
    }

    /// ID of the selected class.
    #[must_use]
    pub fn selected_class_id(&self) -> Option<ClassId> {
        self.state.read().selected_class
    }

    /// The selected class, looked up in the collection.
    #[must_use]
    pub fn current_class(&self) -> Option<ClassRecord> {
        let state = self.state.read();
        state.selected_class.and_then(|id| state.find(id).cloned())
    }

    /// Chat sessions of the selected class.
    #[must_use]
    pub fn chat_sessions(&self) -> Vec<ChatSession> {
        self.state.read().chats.clone()
    }

    /// ID of the selected chat.
    #[must_use]
    pub fn selected_chat_id(&self) -> Option<u64> {
        self.state.read().selected_chat
    }

    /// The selected chat, looked up in the loaded sessions.
    #[must_use]
    pub fn current_chat(&self) -> Option<ChatSession> {
        let state = self.state.read();
        state
            .selected_chat
            .and_then(|id| state.chats.iter().find(|c| c.id == id).cloned())
    }

    /// Staged upload-queue entries.
    #[must_use]
    pub fn upload_queue(&self) -> Vec<QueueEntry> {
        self.state.read().queue.entries().to_vec()
    }

    /// True while any action is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Message of the last failed action.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ==================== Collection ====================

    /// Reloads the class list.
    ///
    /// The persisted selected-class ID is re-resolved against the new list
    /// and cleared when it no longer matches a class. A response that
    /// arrives after a newer fetch was issued is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the request fails; the message is
    /// also recorded in [`ClassStore::error`].
    pub async fn fetch_classes(&self) -> StoreResult<()> {
        let ticket = self.list_requests.issue(());
        let _loading = self.in_flight.enter(&self.revision);

        let classes = match self.api.classes().list().await {
            Ok(classes) => classes,
            Err(e) => {
                let err = StoreError::api(e, "Failed to fetch classes");
                if !self.list_requests.is_latest(&(), ticket) {
                    tracing::debug!(ticket, error = %err, "Ignoring stale class list failure");
                    return Err(err);
                }
                return Err(self.fail(err));
            }
        };

        if !self.list_requests.is_latest(&(), ticket) {
            tracing::debug!(ticket, "Discarding stale class list");
            return Ok(());
        }

        let persisted = self
            .storage
            .get(SELECTED_CLASS_KEY)
            .and_then(|s| s.parse::<ClassId>().ok());

        {
            let mut state = self.state.write();
            state.classes = classes;
            state.error = None;

            let candidate = persisted.or(state.selected_class);
            match candidate {
                Some(id) if state.find(id).is_some() => {
                    if state.selected_class != Some(id) {
                        state.selected_chat = None;
                        state.chats.clear();
                    }
                    state.selected_class = Some(id);
                }
                Some(id) => {
                    tracing::info!(class_id = id, "Selected class no longer available");
                    state.clear_selection();
                }
                None => state.clear_selection(),
            }
            tracing::debug!(count = state.classes.len(), "Loaded classes");
        }

        if self.selected_class_id().is_none() && self.storage.get(SELECTED_CLASS_KEY).is_some() {
            self.forget_selection();
        }

        self.revision.bump();
        Ok(())
    }

    /// Creates a class with its initial files and videos, appends it and
    /// selects it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] with the server's message, or
    /// "Failed to create class".
    pub async fn create_class(&self, data: CreateClassData) -> StoreResult<ClassRecord> {
        let _loading = self.in_flight.enter(&self.revision);

        let class = match self.api.classes().create(data).await {
            Ok(class) => class,
            Err(e) => return Err(self.fail(StoreError::api(e, "Failed to create class"))),
        };

        tracing::info!(class_id = class.id, name = %class.name, "Created class");
        {
            let mut state = self.state.write();
            state.upsert(class.clone());
            state.error = None;
        }
        self.select_class(class.id);
        Ok(class)
    }

    /// Joins a class by code, appends it and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the code is unknown or the request fails.
    pub async fn join_class(&self, class_code: &str) -> StoreResult<ClassRecord> {
        let _loading = self.in_flight.enter(&self.revision);

        let class = match self.api.classes().join(class_code.trim()).await {
            Ok(class) => class,
            Err(e) => return Err(self.fail(StoreError::api(e, "Failed to join class"))),
        };

        tracing::info!(class_id = class.id, "Joined class");
        {
            let mut state = self.state.write();
            state.upsert(class.clone());
            state.error = None;
        }
        self.select_class(class.id);
        Ok(class)
    }

    /// Loads a class with its documents and replaces the collection entry.
    ///
    /// When a newer request for the same class was issued while this one
    /// was out, the response is discarded and the collection's current
    /// entry is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the request fails, or
    /// [`StoreError::Superseded`] if the response was discarded and the
    /// class is no longer loaded.
    pub async fn fetch_class_details(&self, id: ClassId) -> StoreResult<ClassRecord> {
        let ticket = self.detail_requests.issue(id);
        let _loading = self.in_flight.enter(&self.revision);

        let class = match self.api.classes().get(id).await {
            Ok(class) => class,
            Err(e) => {
                let err = StoreError::api(e, "Failed to load class details");
                if !self.detail_requests.is_latest(&id, ticket) {
                    tracing::debug!(
                        class_id = id,
                        ticket,
                        error = %err,
                        "Ignoring stale class details failure"
                    );
                    return Err(err);
                }
                return Err(self.fail(err));
            }
        };

        {
            let mut state = self.state.write();
            if !self.detail_requests.is_latest(&id, ticket) {
                tracing::debug!(class_id = id, ticket, "Discarding stale class details");
                return state.find(id).cloned().ok_or(StoreError::Superseded);
            }
            state.upsert(class.clone());
            state.error = None;
        }

        self.revision.bump();
        Ok(class)
    }

    /// Updates name and/or description.
    ///
    /// Update responses carry no documents, so the loaded documents are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the request fails.
    pub async fn update_class(&self, id: ClassId, patch: ClassPatch) -> StoreResult<ClassRecord> {
        let _loading = self.in_flight.enter(&self.revision);

        let mut updated = match self.api.classes().update(id, &patch).await {
            Ok(class) => class,
            Err(e) => return Err(self.fail(StoreError::api(e, "Failed to update class"))),
        };

        {
            let mut state = self.state.write();
            if let Some(existing) = state.find(id) {
                if updated.documents.is_empty() {
                    updated.documents = existing.documents.clone();
                }
            }
            state.upsert(updated.clone());
            state.error = None;
        }

        self.revision.bump();
        Ok(updated)
    }

    /// Deletes a class. Deleting the selected class clears the selection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the request fails.
    pub async fn delete_class(&self, id: ClassId) -> StoreResult<()> {
        let _loading = self.in_flight.enter(&self.revision);

        if let Err(e) = self.api.classes().delete(id).await {
            return Err(self.fail(StoreError::api(e, "Failed to delete class")));
        }

        let was_selected = {
            let mut state = self.state.write();
            state.classes.retain(|c| c.id != id);
            state.error = None;
            let was_selected = state.selected_class == Some(id);
            if was_selected {
                state.clear_selection();
            }
            was_selected
        };

        if was_selected {
            self.forget_selection();
        }

        tracing::info!(class_id = id, "Deleted class");
        self.revision.bump();
        Ok(())
    }

    // ==================== Selection ====================

    /// Selects a class by ID and clears the selected chat.
    ///
    /// The ID is persisted so the selection survives restarts. Selecting an
    /// ID that is not loaded is allowed; [`ClassStore::current_class`]
    /// resolves it once the class appears.
    pub fn select_class(&self, id: ClassId) {
        {
            let mut state = self.state.write();
            if state.selected_class != Some(id) {
                state.chats.clear();
            }
            state.selected_class = Some(id);
            state.selected_chat = None;
        }

        if let Err(e) = self.storage.set(SELECTED_CLASS_KEY, &id.to_string()) {
            tracing::warn!("Failed to persist selected class: {}", e);
        }
        self.revision.bump();
    }

    /// Selects a chat session by ID, or clears the selection.
    pub fn select_chat(&self, id: Option<u64>) {
        self.state.write().selected_chat = id;
        self.revision.bump();
    }

    fn forget_selection(&self) {
        if let Err(e) = self.storage.remove(SELECTED_CLASS_KEY) {
            tracing::warn!("Failed to clear selected class: {}", e);
        }
    }

    // ==================== Documents ====================

    /// Uploads a file to a class, then reloads the class.
    ///
    /// A failed reload does not fail the upload; it is only recorded in
    /// [`ClassStore::error`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for oversized or unsupported
    /// files, or [`StoreError::Api`] if the upload fails.
    pub async fn upload_document(
        &self,
        class_id: ClassId,
        file: UploadFile,
        description: Option<&str>,
    ) -> StoreResult<DocumentRecord> {
        self.check_file(&file)?;

        let doc = {
            let _loading = self.in_flight.enter(&self.revision);
            match self
                .api
                .documents()
                .upload_to_class(class_id, file, description)
                .await
            {
                Ok(doc) => doc,
                Err(e) => return Err(self.fail(StoreError::api(e, "Failed to upload document"))),
            }
        };

        tracing::info!(class_id, document_id = doc.id, "Uploaded document");
        self.refresh_after_change(class_id).await;
        Ok(doc)
    }

    /// Attaches a YouTube video to a class, then reloads the class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for malformed links, or
    /// [`StoreError::Api`] if the upload fails.
    pub async fn upload_youtube_video(
        &self,
        class_id: ClassId,
        url: &str,
        description: Option<&str>,
    ) -> StoreResult<DocumentRecord> {
        self.check_video(url)?;

        let doc = {
            let _loading = self.in_flight.enter(&self.revision);
            match self
                .api
                .documents()
                .upload_youtube(class_id, url, description)
                .await
            {
                Ok(doc) => doc,
                Err(e) => return Err(self.fail(StoreError::api(e, "Failed to add video"))),
            }
        };

        tracing::info!(class_id, document_id = doc.id, "Added video");
        self.refresh_after_change(class_id).await;
        Ok(doc)
    }

    /// Replaces a document's description, then reloads the class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the change itself fails.
    pub async fn update_document_description(
        &self,
        class_id: ClassId,
        document_id: DocumentId,
        description: Option<&str>,
    ) -> StoreResult<()> {
        {
            let _loading = self.in_flight.enter(&self.revision);
            if let Err(e) = self
                .api
                .documents()
                .update_description(document_id, description)
                .await
            {
                return Err(self.fail(StoreError::api(e, "Failed to update document")));
            }
        }

        self.refresh_after_change(class_id).await;
        Ok(())
    }

    /// Deletes a document, then reloads the class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the change itself fails.
    pub async fn delete_document(&self, class_id: ClassId, document_id: DocumentId) -> StoreResult<()> {
        {
            let _loading = self.in_flight.enter(&self.revision);
            if let Err(e) = self.api.documents().delete(document_id).await {
                return Err(self.fail(StoreError::api(e, "Failed to delete document")));
            }
        }

        tracing::info!(class_id, document_id, "Deleted document");
        self.refresh_after_change(class_id).await;
        Ok(())
    }

    /// Reloads a class after a change the server already applied. The
    /// change stands whether or not the reload works.
    async fn refresh_after_change(&self, class_id: ClassId) {
        if let Err(e) = self.fetch_class_details(class_id).await {
            tracing::warn!(class_id, error = %e, "Change applied but class reload failed");
        }
    }

    // ==================== Upload Queue ====================

    /// Stages a new file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for oversized or unsupported files.
    pub fn add_to_upload_queue(
        &self,
        file: UploadFile,
        description: Option<String>,
    ) -> StoreResult<EntryKey> {
        self.check_file(&file)?;
        let key = self.state.write().queue.add_file(file, description);
        self.revision.bump();
        Ok(key)
    }

    /// Stages a new YouTube link.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for malformed links.
    pub fn add_video_to_upload_queue(
        &self,
        url: &str,
        description: Option<String>,
    ) -> StoreResult<EntryKey> {
        self.check_video(url)?;
        let key = self
            .state
            .write()
            .queue
            .add_video(url.trim().to_string(), description);
        self.revision.bump();
        Ok(key)
    }

    /// Stages a server document as `existing`.
    pub fn add_existing_to_queue(&self, doc: &DocumentRecord) -> EntryKey {
        let key = self.state.write().queue.add_existing(doc);
        self.revision.bump();
        key
    }

    /// Removes a new entry, or marks a server entry `deleted`.
    pub fn remove_from_upload_queue(&self, key: impl Into<EntryKey>) -> bool {
        let removed = self.state.write().queue.remove(&key.into());
        self.revision.bump();
        removed
    }

    /// Changes a staged entry's description.
    pub fn update_file_description(
        &self,
        key: impl Into<EntryKey>,
        description: Option<String>,
    ) -> bool {
        let changed = self
            .state
            .write()
            .queue
            .update_description(&key.into(), description);
        self.revision.bump();
        changed
    }

    /// Empties the queue.
    pub fn clear_upload_queue(&self) {
        self.state.write().queue.clear();
        self.revision.bump();
    }

    /// Reloads a class and stages all its documents as `existing`,
    /// replacing whatever was queued.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the class cannot be loaded.
    pub async fn load_queue_from_class(&self, class_id: ClassId) -> StoreResult<usize> {
        let class = self.fetch_class_details(class_id).await?;

        let mut state = self.state.write();
        state.queue.clear();
        for doc in &class.documents {
            state.queue.add_existing(doc);
        }
        let staged = state.queue.len();
        drop(state);

        self.revision.bump();
        Ok(staged)
    }

    /// Sends every pending queue entry for an existing class.
    ///
    /// New files are uploaded, new videos posted, modified entries send
    /// their description, deleted entries are deleted and unchanged entries
    /// are skipped. Each applied entry leaves the queue as it succeeds. The
    /// class is reloaded once at the end and the queue is cleared.
    ///
    /// # Errors
    ///
    /// Stops at the first failed request and returns it; entries not yet
    /// applied stay queued. There is no rollback of entries already applied.
    /// A failed reload after every entry was applied is not an error.
    pub async fn submit_upload_queue(&self, class_id: ClassId) -> StoreResult<SubmitSummary> {
        let entries: Vec<QueueEntry> = self
            .state
            .read()
            .queue
            .entries()
            .iter()
            .filter(|e| e.is_pending())
            .cloned()
            .collect();

        let mut summary = SubmitSummary::default();
        {
            let _loading = self.in_flight.enter(&self.revision);
            let documents = self.api.documents();

            for entry in entries {
                let description = entry.description.as_deref();
                let result = match (entry.status, entry.document_id()) {
                    (DocumentStatus::New, _) => {
                        if let Some(file) = entry.file.clone() {
                            summary.uploaded += 1;
                            documents
                                .upload_to_class(class_id, file, description)
                                .await
                                .map(|_| ())
                        } else if let Some(url) = entry.url.as_deref() {
                            summary.uploaded += 1;
                            documents
                                .upload_youtube(class_id, url, description)
                                .await
                                .map(|_| ())
                        } else {
                            Ok(())
                        }
                    }
                    (DocumentStatus::Modified, Some(id)) => {
                        summary.updated += 1;
                        documents
                            .update_description(id, description)
                            .await
                            .map(|_| ())
                    }
                    (DocumentStatus::Deleted, Some(id)) => {
                        summary.deleted += 1;
                        documents.delete(id).await
                    }
                    _ => Ok(()),
                };

                if let Err(e) = result {
                    tracing::warn!(class_id, entry = %entry.key, "Queue submission failed");
                    return Err(self.fail(StoreError::api(e, "Failed to save class documents")));
                }

                self.state.write().queue.discard(&entry.key);
                self.revision.bump();
            }
        }

        tracing::info!(
            class_id,
            uploaded = summary.uploaded,
            updated = summary.updated,
            deleted = summary.deleted,
            "Submitted upload queue"
        );

        self.refresh_after_change(class_id).await;
        self.clear_upload_queue();
        Ok(summary)
    }

    /// Creates a class from the queue's new entries, then clears the queue.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if creation fails; the queue is kept.
    pub async fn create_class_from_queue(
        &self,
        name: &str,
        description: Option<String>,
    ) -> StoreResult<ClassRecord> {
        let data = self.state.read().queue.to_create_data(name, description);
        let class = self.create_class(data).await?;
        self.clear_upload_queue();
        Ok(class)
    }

    // ==================== Chat Sessions ====================

    /// Loads the chat sessions of the selected class.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no class is selected, or
    /// [`StoreError::Api`] if the request fails.
    pub async fn fetch_chat_sessions(&self) -> StoreResult<Vec<ChatSession>> {
        let class_id = self.require_selected_class()?;
        let _loading = self.in_flight.enter(&self.revision);

        let sessions = match self.api.chat().sessions(class_id).await {
            Ok(sessions) => sessions,
            Err(e) => return Err(self.fail(StoreError::api(e, "Failed to load chats"))),
        };

        {
            let mut state = self.state.write();
            // The user may have switched class while the request was out.
            if state.selected_class == Some(class_id) {
                state.chats = sessions.clone();
                let selected_chat = state.selected_chat;
                if selected_chat.is_some_and(|id| !state.chats.iter().any(|c| c.id == id)) {
                    state.selected_chat = None;
                }
            }
        }

        self.revision.bump();
        Ok(sessions)
    }

    /// Opens a chat session in the selected class and selects it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no class is selected, or
    /// [`StoreError::Api`] if the request fails.
    pub async fn create_chat_session(&self, title: &str) -> StoreResult<ChatSession> {
        let class_id = self.require_selected_class()?;
        let _loading = self.in_flight.enter(&self.revision);

        let session = match self.api.chat().create_session(title, class_id).await {
            Ok(session) => session,
            Err(e) => return Err(self.fail(StoreError::api(e, "Failed to create chat"))),
        };

        {
            let mut state = self.state.write();
            if state.selected_class == Some(class_id) {
                state.chats.push(session.clone());
                state.selected_chat = Some(session.id);
            }
        }

        self.revision.bump();
        Ok(session)
    }

    /// Deletes a chat session. Deleting the selected chat clears it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the request fails.
    pub async fn delete_chat_session(&self, session_id: u64) -> StoreResult<()> {
        let _loading = self.in_flight.enter(&self.revision);

        if let Err(e) = self.api.chat().delete_session(session_id).await {
            return Err(self.fail(StoreError::api(e, "Failed to delete chat")));
        }

        {
            let mut state = self.state.write();
            state.chats.retain(|c| c.id != session_id);
            if state.selected_chat == Some(session_id) {
                state.selected_chat = None;
            }
        }

        self.revision.bump();
        Ok(())
    }

    // ==================== Lifecycle ====================

    /// Drops all in-memory state and invalidates in-flight fetches.
    ///
    /// The persisted selection is kept; the next `fetch_classes` clears it
    /// if it does not resolve for the next user.
    pub fn reset(&self) {
        self.list_requests.reset();
        self.detail_requests.reset();
        *self.state.write() = ClassState::default();
        self.revision.bump();
    }

    // ==================== Helpers ====================

    fn require_selected_class(&self) -> StoreResult<ClassId> {
        self.selected_class_id()
            .ok_or_else(|| self.fail(StoreError::NotFound("No class selected".to_string())))
    }

    fn check_file(&self, file: &UploadFile) -> StoreResult<()> {
        validate_file_upload(file.size(), &file.mime_type)
            .into_result()
            .map_err(|msg| self.fail(StoreError::Validation(msg)))
    }

    fn check_video(&self, url: &str) -> StoreResult<()> {
        validate_youtube_url(url.trim())
            .into_result()
            .map_err(|msg| self.fail(StoreError::Validation(msg)))
    }

    /// Records the error message and hands the error back.
    fn fail(&self, err: StoreError) -> StoreError {
        tracing::warn!(error = %err, "Class store action failed");
        self.state.write().error = Some(err.message());
        self.revision.bump();
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn offline_store() -> ClassStore {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        ClassStore::new(api, Arc::new(MemoryStore::new()))
    }

    fn doc(id: DocumentId) -> DocumentRecord {
        DocumentRecord {
            id,
            filename: "notes.pdf".into(),
            size: 10,
            doc_type: "application/pdf".into(),
            description: Some("Week 1".into()),
            url: None,
            status: DocumentStatus::Existing,
            processing_status: None,
        }
    }

    #[test]
    fn test_select_class_clears_chat() {
        let store = offline_store();
        store.select_chat(Some(11));
        assert_eq!(store.selected_chat_id(), Some(11));

        store.select_class(5);

        assert_eq!(store.selected_class_id(), Some(5));
        assert!(store.selected_chat_id().is_none());
        assert_eq!(store.storage.get(SELECTED_CLASS_KEY).as_deref(), Some("5"));
    }

    #[test]
    fn test_current_class_resolves_by_id() {
        let store = offline_store();
        store.select_class(5);
        assert!(store.current_class().is_none());

        store.state.write().upsert(ClassRecord {
            id: 5,
            name: "Bio".into(),
            description: None,
            code: "BIO5".into(),
            documents: vec![],
            owner_id: None,
            is_owner: false,
            member_count: 0,
            document_count: 0,
            chat_session_count: 0,
        });
        assert_eq!(store.current_class().unwrap().name, "Bio");
    }

    #[test]
    fn test_existing_then_remove_is_deleted() {
        let store = offline_store();
        let d = doc(8);
        store.add_existing_to_queue(&d);
        assert!(store.remove_from_upload_queue(d.id));

        let queue = store.upload_queue();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].status, DocumentStatus::Deleted);
    }

    #[test]
    fn test_clear_upload_queue_is_idempotent() {
        let store = offline_store();
        store.add_existing_to_queue(&doc(1));

        store.clear_upload_queue();
        assert!(store.upload_queue().is_empty());
        store.clear_upload_queue();
        assert!(store.upload_queue().is_empty());
    }

    #[test]
    fn test_invalid_file_rejected_before_queueing() {
        let store = offline_store();
        let file = UploadFile::new("photo.png", "image/png", vec![1, 2, 3]);

        let err = store.add_to_upload_queue(file, None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.upload_queue().is_empty());
        assert!(store.error().unwrap().starts_with("File type not supported"));
    }

    #[test]
    fn test_invalid_video_rejected() {
        let store = offline_store();
        assert!(store
            .add_video_to_upload_queue("https://youtu.be/short", None)
            .is_err());
        assert!(store
            .add_video_to_upload_queue("https://youtu.be/dQw4w9WgXcQ", None)
            .is_ok());
        assert_eq!(store.upload_queue().len(), 1);
    }

    #[test]
    fn test_edit_description_tracks_original() {
        let store = offline_store();
        let d = doc(3);
        store.add_existing_to_queue(&d);

        store.update_file_description(d.id, Some("Week 2".into()));
        assert_eq!(store.upload_queue()[0].status, DocumentStatus::Modified);

        store.update_file_description(d.id, Some("Week 1".into()));
        assert_eq!(store.upload_queue()[0].status, DocumentStatus::Existing);
    }

    #[tokio::test]
    async fn test_chat_actions_need_selected_class() {
        let store = offline_store();
        let err = store.fetch_chat_sessions().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.error().as_deref(), Some("No class selected"));
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let store = offline_store();
        let rx = store.subscribe();
        let before = *rx.borrow();

        store.select_class(1);
        assert!(*rx.borrow() > before);
    }

    #[test]
    fn test_reset_drops_state() {
        let store = offline_store();
        store.select_class(2);
        store.add_existing_to_queue(&doc(1));

        store.reset();
        assert!(store.selected_class_id().is_none());
        assert!(store.upload_queue().is_empty());
    }
}
