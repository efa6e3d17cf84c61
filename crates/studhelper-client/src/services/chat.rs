//! Chat endpoints.

use studhelper_types::{ChatMessage, ChatReply, ChatSession, ClassId};

use crate::error::ApiResult;
use crate::gateway::ApiClient;
use crate::types::{CreateSessionRequest, SendMessageRequest};

/// `/chat/*` endpoints.
pub struct ChatService<'a> {
    api: &'a ApiClient,
}

impl<'a> ChatService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Chat sessions of the current user in a class.
    pub async fn sessions(&self, class_id: ClassId) -> ApiResult<Vec<ChatSession>> {
        self.api
            .get_with_query("/chat/sessions", &[("class_id", class_id)])
            .await
    }

    /// Opens a new chat session.
    pub async fn create_session(&self, title: &str, class_id: ClassId) -> ApiResult<ChatSession> {
        self.api
            .post("/chat/sessions", &CreateSessionRequest { title, class_id })
            .await
    }

    /// Message history of a session.
    pub async fn messages(&self, session_id: u64) -> ApiResult<Vec<ChatMessage>> {
        self.api
            .get(&format!("/chat/sessions/{session_id}/messages"))
            .await
    }

    /// Sends a message and waits for the assistant's reply.
    pub async fn send(&self, session_id: u64, content: &str) -> ApiResult<ChatReply> {
        self.api
            .post(
                &format!("/chat/sessions/{session_id}/messages"),
                &SendMessageRequest { content },
            )
            .await
    }

    /// Deletes a session and its messages.
    pub async fn delete_session(&self, session_id: u64) -> ApiResult<()> {
        self.api
            .delete(&format!("/chat/sessions/{session_id}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message(id: u64, is_user: bool, content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id, "session_id": 3, "content": content, "is_user": is_user, "tokens_used": 12
        })
    }

    #[tokio::test]
    async fn test_sessions_filtered_by_class() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chat/sessions"))
            .and(query_param("class_id", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 3, "title": "Exam prep", "class_id": 8, "message_count": 4}
            ])))
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let sessions = api.chat().sessions(8).await.unwrap();
        assert_eq!(sessions[0].title, "Exam prep");
        assert_eq!(sessions[0].message_count, 4);
    }

    #[tokio::test]
    async fn test_send_returns_both_messages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/sessions/3/messages"))
            .and(body_json(serde_json::json!({"content": "What is ATP?"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_message": message(1, true, "What is ATP?"),
                "ai_response": message(2, false, "Adenosine triphosphate."),
                "cost": 0.001,
                "response_time_ms": 850,
                "context_provided": true
            })))
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let reply = api.chat().send(3, "What is ATP?").await.unwrap();

        assert!(reply.user_message.is_user);
        assert_eq!(reply.ai_response.content, "Adenosine triphosphate.");
        assert!(reply.context_provided);
    }

    #[tokio::test]
    async fn test_create_and_delete_session() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/sessions"))
            .and(body_json(serde_json::json!({"title": "New chat", "class_id": 8})))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 9, "title": "New chat", "class_id": 8
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/chat/sessions/9"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let session = api.chat().create_session("New chat", 8).await.unwrap();
        api.chat().delete_session(session.id).await.unwrap();
    }
}
