//! # HTTP Gateway
//!
//! The single configured HTTP client every service goes through.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{multipart::Form, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::{AuthService, ChatService, ClassService, DocumentService, UsageService};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the StudHelper API.
///
/// Holds the API root, the request timeout and the shared session token.
/// When a token is set it is sent as a bearer token on every request.
/// The client is cheaply cloneable; clones share the same token slot, so a
/// login through one clone authenticates all of them.
///
/// # Examples
///
/// ```rust,ignore
/// use studhelper_client::ApiClient;
///
/// let api = ApiClient::new("http://localhost:8000/api/v1")?;
/// let token = api.auth().login("ada@example.com", "Secret123").await?;
/// api.set_token(Some(token.access_token));
///
/// let classes = api.classes().list().await?;
/// println!("{} classes", classes.len());
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a client for the given API root with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            http,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns the configured API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Installs or clears the bearer token.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// Returns the current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    // ==================== Services ====================

    /// Authentication endpoints.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    /// Class endpoints.
    #[must_use]
    pub fn classes(&self) -> ClassService<'_> {
        ClassService::new(self)
    }

    /// Chat endpoints.
    #[must_use]
    pub fn chat(&self) -> ChatService<'_> {
        ChatService::new(self)
    }

    /// Document endpoints.
    #[must_use]
    pub fn documents(&self) -> DocumentService<'_> {
        DocumentService::new(self)
    }

    /// Usage endpoints.
    #[must_use]
    pub fn usage(&self) -> UsageService<'_> {
        UsageService::new(self)
    }

    // ==================== Request Plumbing ====================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.token.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET` a JSON resource.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        read_json(self.send(Method::GET, path, self.request(Method::GET, path)).await?).await
    }

    /// `GET` a JSON resource with an explicit bearer token, leaving the
    /// shared token slot untouched.
    pub(crate) async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> ApiResult<T> {
        let builder = self
            .http
            .request(Method::GET, format!("{}{}", self.base_url, path))
            .bearer_auth(token);
        read_json(self.send(Method::GET, path, builder).await?).await
    }

    /// `GET` a JSON resource with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path).query(query);
        read_json(self.send(Method::GET, path, builder).await?).await
    }

    /// `POST` a JSON body.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        read_json(self.send(Method::POST, path, builder).await?).await
    }

    /// `POST` without a body, ignoring the response body.
    pub(crate) async fn post_empty(&self, path: &str) -> ApiResult<()> {
        self.send(Method::POST, path, self.request(Method::POST, path))
            .await?;
        Ok(())
    }

    /// `POST` a multipart form.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ApiResult<T> {
        let builder = self.request(Method::POST, path).multipart(form);
        read_json(self.send(Method::POST, path, builder).await?).await
    }

    /// `PUT` a JSON body.
    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        read_json(self.send(Method::PUT, path, builder).await?).await
    }

    /// `DELETE` a resource.
    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(Method::DELETE, path, self.request(Method::DELETE, path))
            .await?;
        Ok(())
    }

    /// Sends a request and turns non-success statuses into [`ApiError::Server`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ApiResult<reqwest::Response> {
        let res = builder.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Request failed");
            ApiError::from(e)
        })?;

        let status = res.status();
        tracing::debug!(%method, path, status = status.as_u16(), "Response received");

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::from_body(status.as_u16(), &body));
        }

        Ok(res)
    }
}

async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> ApiResult<T> {
    let bytes = res.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
