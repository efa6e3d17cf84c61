//! Route guard.
//!
//! Decides where a navigation actually lands given the session: pages
//! behind auth bounce to the landing page, guest-only pages bounce to the
//! dashboard.

use std::fmt;

use crate::stores::AuthStore;

/// Application pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, guests only.
    Landing,
    /// `/dashboard`, signed-in users only.
    Dashboard,
    /// `/help`, open to everyone.
    Help,
    /// Any other path.
    NotFound,
}

impl Route {
    /// Matches a path to a route.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" => Self::Landing,
            "/dashboard" => Self::Dashboard,
            "/help" => Self::Help,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Dashboard => "/dashboard",
            Self::Help => "/help",
            Self::NotFound => "/404",
        }
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    #[must_use]
    pub fn requires_guest(&self) -> bool {
        matches!(self, Self::Landing)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Resolves the route a navigation to `to` ends on.
///
/// A restored token without a profile is re-hydrated first, unless an auth
/// action is already running. A failed re-hydration leaves the user logged
/// out and is otherwise ignored here.
pub async fn resolve_route(to: Route, auth: &AuthStore) -> Route {
    let session = auth.session();
    if session.token.is_some() && session.user.is_none() && !auth.is_loading() {
        if let Err(e) = auth.initialize_auth().await {
            tracing::debug!(error = %e, "Session restore failed during navigation");
        }
    }

    let authenticated = auth.is_authenticated();
    let target = if to.requires_auth() && !authenticated {
        Route::Landing
    } else if to.requires_guest() && authenticated {
        Route::Dashboard
    } else {
        to
    };

    if target != to {
        tracing::debug!(from = %to, to = %target, "Redirecting");
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TOKEN_KEY};
    use std::sync::Arc;
    use studhelper_client::ApiClient;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn guest() -> AuthStore {
        AuthStore::new(
            ApiClient::new("http://127.0.0.1:9").unwrap(),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::from_path("/"), Route::Landing);
        assert_eq!(Route::from_path("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::from_path("/help"), Route::Help);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
    }

    #[tokio::test]
    async fn test_guest_is_sent_to_landing() {
        let auth = guest();
        assert_eq!(resolve_route(Route::Dashboard, &auth).await, Route::Landing);
        assert_eq!(resolve_route(Route::Landing, &auth).await, Route::Landing);
        assert_eq!(resolve_route(Route::Help, &auth).await, Route::Help);
        assert_eq!(resolve_route(Route::NotFound, &auth).await, Route::NotFound);
    }

    #[tokio::test]
    async fn test_restored_token_is_rehydrated_before_deciding() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1, "email": "ada@example.com", "username": "ada"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = AuthStore::new(
            ApiClient::new(mock_server.uri()).unwrap(),
            Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "saved")])),
        );

        assert_eq!(resolve_route(Route::Landing, &auth).await, Route::Dashboard);
        // Already hydrated; no second profile request.
        assert_eq!(resolve_route(Route::Dashboard, &auth).await, Route::Dashboard);
    }

    #[tokio::test]
    async fn test_expired_token_lands_on_landing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let auth = AuthStore::new(
            ApiClient::new(mock_server.uri()).unwrap(),
            Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "expired")])),
        );

        assert_eq!(resolve_route(Route::Dashboard, &auth).await, Route::Landing);
        assert!(auth.token().is_none());
    }
}
