//! Auth facade.

use studhelper_client::{FirebaseLoginRequest, RegisterRequest};
use studhelper_types::{ProfileUpdate, UserProfile};
use studhelper_validation::{validate_email, validate_password, validate_username};

use super::check_all;
use crate::context::AppContext;
use crate::error::{StoreError, StoreResult};

/// Session views and actions.
pub struct AuthFacade<'a> {
    ctx: &'a AppContext,
}

impl<'a> AuthFacade<'a> {
    pub(crate) fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.ctx.auth().user()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.ctx.auth().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.ctx.auth().is_loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.ctx.auth().error()
    }

    /// Logs in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if either field is blank, or the
    /// auth store's error.
    pub async fn login(&self, email: &str, password: &str) -> StoreResult<UserProfile> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(StoreError::Validation(
                "Email and password are required".to_string(),
            ));
        }
        self.ctx.auth().login(email.trim(), password).await
    }

    /// Validates every field, then registers and logs in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] listing every invalid field, or
    /// the auth store's error.
    pub async fn register(&self, req: &RegisterRequest) -> StoreResult<UserProfile> {
        check_all([
            validate_email(&req.email),
            validate_username(&req.username),
            validate_password(&req.password),
        ])?;
        self.ctx.auth().register(req).await
    }

    /// Signs in with a Firebase ID token.
    ///
    /// # Errors
    ///
    /// Returns the auth store's error.
    pub async fn firebase_login(&self, req: &FirebaseLoginRequest) -> StoreResult<UserProfile> {
        if req.id_token.is_empty() {
            return Err(StoreError::Validation("Missing ID token".to_string()));
        }
        self.ctx.auth().firebase_login(req).await
    }

    /// Updates the profile; a new email must be well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a malformed email, or the
    /// auth store's error.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> StoreResult<UserProfile> {
        if let Some(email) = &update.email {
            validate_email(email).into_result().map_err(StoreError::Validation)?;
        }
        self.ctx.auth().update_profile(update).await
    }

    /// Logs out and tears down class and UI state.
    pub async fn logout(&self) {
        self.ctx.logout().await;
    }
}
