//! # Application Context
//!
//! One context is created at startup and shared by reference. It holds the
//! gateway, the three stores and the durable key-value storage; facades
//! borrow it.
//!
//! ```rust,no_run
//! use studhelper_store::{AppContext, Settings};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = AppContext::new(Settings::load()?)?;
//! ctx.startup().await;
//! for class in ctx.classes().classes() {
//!     println!("{}", class.name);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use studhelper_client::{ApiClient, ApiResult};

use crate::facades::{AuthFacade, ClassesFacade, FileUploadFacade, UiFacade};
use crate::settings::Settings;
use crate::storage::{FileStore, KeyValueStore};
use crate::stores::{AuthStore, ClassStore, UiStore};

/// Gateway, stores and storage for one running client.
pub struct AppContext {
    settings: Settings,
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    auth: AuthStore,
    classes: ClassStore,
    ui: UiStore,
}

impl AppContext {
    /// Creates a context backed by the JSON storage file named in the
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: Settings) -> ApiResult<Self> {
        let storage = Arc::new(FileStore::open(settings.storage_path()));
        Self::with_storage(settings, storage)
    }

    /// Creates a context over the given storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(settings: Settings, storage: Arc<dyn KeyValueStore>) -> ApiResult<Self> {
        let api = ApiClient::with_timeout(settings.api_url.clone(), settings.timeout())?;
        tracing::debug!(api_url = %api.base_url(), "Created application context");

        Ok(Self {
            auth: AuthStore::new(api.clone(), storage.clone()),
            classes: ClassStore::new(api.clone(), storage.clone()),
            ui: UiStore::new(),
            settings,
            api,
            storage,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The shared gateway. Its token follows the auth store.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    #[must_use]
    pub fn classes(&self) -> &ClassStore {
        &self.classes
    }

    #[must_use]
    pub fn ui(&self) -> &UiStore {
        &self.ui
    }

    // ==================== Facades ====================

    #[must_use]
    pub fn auth_facade(&self) -> AuthFacade<'_> {
        AuthFacade::new(self)
    }

    #[must_use]
    pub fn classes_facade(&self) -> ClassesFacade<'_> {
        ClassesFacade::new(self)
    }

    #[must_use]
    pub fn ui_facade(&self) -> UiFacade<'_> {
        UiFacade::new(self)
    }

    /// A file-upload helper with fresh upload state.
    #[must_use]
    pub fn file_upload(&self) -> FileUploadFacade<'_> {
        FileUploadFacade::new(self)
    }

    // ==================== Lifecycle ====================

    /// Restores a persisted session and, if that succeeds, loads classes.
    ///
    /// Failures are recorded in the stores; the context stays usable as a
    /// guest. Returns whether a session is established.
    pub async fn startup(&self) -> bool {
        match self.auth.initialize_auth().await {
            Ok(true) => {
                if let Err(e) = self.classes.fetch_classes().await {
                    tracing::warn!(error = %e, "Failed to load classes at startup");
                }
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::info!(error = %e, "Starting without a session");
                false
            }
        }
    }

    /// Ends the session and tears down class and UI state.
    ///
    /// The server is told about the logout when a token is present; a
    /// failure there does not stop the local logout.
    pub async fn logout(&self) {
        if self.auth.token().is_some() {
            if let Err(e) = self.api.auth().logout().await {
                tracing::debug!(error = %e, "Server logout failed");
            }
        }
        self.auth.logout();
        self.classes.reset();
        self.ui.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SELECTED_CLASS_KEY, TOKEN_KEY};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(uri: String) -> Settings {
        Settings {
            api_url: uri,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_startup_without_token_stays_guest() {
        let ctx = AppContext::with_storage(
            settings("http://127.0.0.1:9".into()),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();

        assert!(!ctx.startup().await);
        assert!(ctx.classes().classes().is_empty());
    }

    #[tokio::test]
    async fn test_startup_restores_session_and_classes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1, "email": "ada@example.com", "username": "ada"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/classes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 3, "name": "Bio", "class_code": "BIO003"}
            ])))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let storage = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "saved"),
            (SELECTED_CLASS_KEY, "3"),
        ]));
        let ctx = AppContext::with_storage(settings(mock_server.uri()), storage.clone()).unwrap();

        assert!(ctx.startup().await);
        assert_eq!(ctx.classes().current_class().unwrap().name, "Bio");

        ctx.logout().await;
        assert!(!ctx.auth().is_authenticated());
        assert!(ctx.classes().classes().is_empty());
        assert!(ctx.api().token().is_none());
        assert!(storage.get(TOKEN_KEY).is_none());
    }
}
