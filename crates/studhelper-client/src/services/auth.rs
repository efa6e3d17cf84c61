//! Authentication endpoints.

use studhelper_types::{ProfileUpdate, UserProfile};

use crate::error::ApiResult;
use crate::gateway::ApiClient;
use crate::types::{FirebaseLoginRequest, LoginRequest, RegisterRequest, TokenResponse};

/// `/auth/*` endpoints.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges email and password for a token.
    ///
    /// # Errors
    ///
    /// * [`crate::ApiError::Server`] - Wrong credentials (401)
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let req = LoginRequest {
            username: email.to_string(),
            password: password.to_string(),
        };
        self.api.post("/auth/login", &req).await
    }

    /// Creates an account. Does not log in.
    ///
    /// # Errors
    ///
    /// * [`crate::ApiError::Server`] - Email or username taken (400)
    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<UserProfile> {
        self.api.post("/auth/register", req).await
    }

    /// Exchanges a Firebase ID token for an API token.
    pub async fn firebase_login(&self, req: &FirebaseLoginRequest) -> ApiResult<TokenResponse> {
        self.api.post("/auth/firebase-login", req).await
    }

    /// Profile of the token's owner.
    pub async fn me(&self) -> ApiResult<UserProfile> {
        self.api.get("/auth/me").await
    }

    /// Profile of the owner of `token`, which need not be installed yet.
    pub async fn me_with_token(&self, token: &str) -> ApiResult<UserProfile> {
        self.api.get_as("/auth/me", token).await
    }

    /// Updates email and/or full name.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        self.api.put("/auth/profile", update).await
    }

    /// Notifies the server of a logout. Tokens are stateless, so this is
    /// informational only.
    pub async fn logout(&self) -> ApiResult<()> {
        self.api.post_empty("/auth/logout").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json() -> serde_json::Value {
        serde_json::json!({"id": 1, "email": "ada@example.com", "username": "ada"})
    }

    #[tokio::test]
    async fn test_login_sends_email_as_username() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "username": "ada@example.com",
                "password": "Secret123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "token_type": "bearer",
                "user": user_json()
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let token = api.auth().login("ada@example.com", "Secret123").await.unwrap();

        assert_eq!(token.access_token, "tok");
        assert_eq!(token.user.unwrap().username, "ada");
    }

    #[tokio::test]
    async fn test_register_returns_profile() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json()))
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let user = api
            .auth()
            .register(&RegisterRequest {
                email: "ada@example.com".into(),
                username: "ada".into(),
                password: "Secret123".into(),
                full_name: None,
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_update_profile_uses_put() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/auth/profile"))
            .and(body_json(serde_json::json!({"full_name": "Ada Lovelace"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1, "email": "ada@example.com", "username": "ada", "full_name": "Ada Lovelace"
            })))
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let user = api
            .auth()
            .update_profile(&ProfileUpdate {
                full_name: Some("Ada Lovelace".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_logout_ignores_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"message": "Successfully logged out"})),
            )
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        assert!(api.auth().logout().await.is_ok());
    }
}
