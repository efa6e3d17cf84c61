//! Session lifecycle across restarts, through the application context.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use studhelper_store::{
    resolve_route, AppContext, FileStore, KeyValueStore, Route, Settings, SELECTED_CLASS_KEY,
    TOKEN_KEY,
};
use studhelper_types::ModalName;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(api_url: String, dir: &tempfile::TempDir) -> Settings {
    Settings {
        api_url,
        timeout_secs: 5,
        storage_path: Some(dir.path().join("storage.json")),
    }
}

async fn mock_api() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
            "user": {"id": 1, "email": "ada@example.com", "username": "ada"}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 1, "email": "ada@example.com", "username": "ada"}
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/classes"))
        .and(header("authorization", "Bearer tok-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Statistics", "class_code": "STAT07"}
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_session_survives_restart() {
    let mock_server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();

    {
        let ctx = AppContext::new(settings(mock_server.uri(), &dir)).unwrap();
        ctx.auth_facade()
            .login("ada@example.com", "Secret123")
            .await
            .unwrap();
        ctx.classes().fetch_classes().await.unwrap();
        ctx.classes().select_class(7);
    }

    let ctx = AppContext::new(settings(mock_server.uri(), &dir)).unwrap();
    assert_eq!(ctx.auth().token().as_deref(), Some("tok-abc"));
    assert!(!ctx.auth().is_authenticated());

    assert!(ctx.startup().await);
    assert_eq!(ctx.auth().user().unwrap().username, "ada");
    assert_eq!(ctx.classes().current_class().unwrap().name, "Statistics");
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let mock_server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path().join("kv.json")));

    let ctx = AppContext::with_storage(settings(mock_server.uri(), &dir), storage.clone()).unwrap();
    ctx.auth_facade()
        .login("ada@example.com", "Secret123")
        .await
        .unwrap();
    ctx.classes().fetch_classes().await.unwrap();
    ctx.classes().select_class(7);
    ctx.ui().open_modal(ModalName::ClassSettings, json!({"classId": 7}));

    assert_eq!(resolve_route(Route::Landing, ctx.auth()).await, Route::Dashboard);

    ctx.auth_facade().logout().await;

    assert!(!ctx.auth().is_authenticated());
    assert!(ctx.classes().classes().is_empty());
    assert!(ctx.classes().current_class().is_none());
    assert!(ctx.ui().active_modal().is_none());
    assert!(storage.get(TOKEN_KEY).is_none());
    assert_eq!(storage.get(SELECTED_CLASS_KEY).as_deref(), Some("7"));
    assert_eq!(resolve_route(Route::Dashboard, ctx.auth()).await, Route::Landing);

    // The reopened file agrees with the in-memory view.
    let reopened = FileStore::open(dir.path().join("kv.json"));
    assert!(reopened.get(TOKEN_KEY).is_none());
}

#[tokio::test]
async fn test_logout_while_login_in_flight() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "access_token": "tok-late",
                    "user": {"id": 1, "email": "ada@example.com", "username": "ada"}
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = Arc::new(AppContext::new(settings(mock_server.uri(), &dir)).unwrap());

    let pending = tokio::spawn({
        let ctx = ctx.clone();
        async move { ctx.auth_facade().login("ada@example.com", "Secret123").await }
    });
    while mock_server.received_requests().await.unwrap_or_default().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    ctx.logout().await;

    assert!(pending.await.unwrap().unwrap_err().is_superseded());
    assert!(!ctx.auth().is_authenticated());
    assert!(ctx.api().token().is_none());
    assert!(ctx.storage().get(TOKEN_KEY).is_none());
    assert_eq!(resolve_route(Route::Dashboard, ctx.auth()).await, Route::Landing);
}
