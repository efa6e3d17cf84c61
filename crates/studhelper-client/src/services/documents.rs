//! Document endpoints.

use reqwest::multipart::Form;
use studhelper_types::{ClassId, DocumentId, DocumentRecord};

use crate::error::ApiResult;
use crate::gateway::ApiClient;
use crate::types::{Listing, UpdateDocumentRequest, UploadFile, YouTubeRequest};

/// `/documents/*` endpoints.
pub struct DocumentService<'a> {
    api: &'a ApiClient,
}

impl<'a> DocumentService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Uploads a file to a class knowledge base.
    pub async fn upload_to_class(
        &self,
        class_id: ClassId,
        file: UploadFile,
        description: Option<&str>,
    ) -> ApiResult<DocumentRecord> {
        let form = upload_form(file, description)?;
        self.api
            .post_multipart(&format!("/documents/classes/{class_id}/upload"), form)
            .await
    }

    /// Attaches a YouTube video to a class.
    pub async fn upload_youtube(
        &self,
        class_id: ClassId,
        url: &str,
        description: Option<&str>,
    ) -> ApiResult<DocumentRecord> {
        self.api
            .post(
                &format!("/documents/classes/{class_id}/upload-youtube"),
                &YouTubeRequest { url, description },
            )
            .await
    }

    /// Documents of a class.
    pub async fn list_for_class(&self, class_id: ClassId) -> ApiResult<Vec<DocumentRecord>> {
        let listing: Listing<DocumentRecord> = self
            .api
            .get(&format!("/documents/classes/{class_id}"))
            .await?;
        Ok(listing.into_vec())
    }

    /// Replaces a document's description.
    pub async fn update_description(
        &self,
        document_id: DocumentId,
        description: Option<&str>,
    ) -> ApiResult<DocumentRecord> {
        self.api
            .put(
                &format!("/documents/{document_id}"),
                &UpdateDocumentRequest { description },
            )
            .await
    }

    /// Deletes a document.
    pub async fn delete(&self, document_id: DocumentId) -> ApiResult<()> {
        self.api.delete(&format!("/documents/{document_id}")).await
    }

    /// Uploads a file scoped to a single chat session.
    pub async fn upload_to_session(
        &self,
        session_id: u64,
        file: UploadFile,
    ) -> ApiResult<DocumentRecord> {
        let form = upload_form(file, None)?;
        self.api
            .post_multipart(&format!("/documents/sessions/{session_id}/upload"), form)
            .await
    }

    /// Documents scoped to a chat session.
    pub async fn list_for_session(&self, session_id: u64) -> ApiResult<Vec<DocumentRecord>> {
        let listing: Listing<DocumentRecord> = self
            .api
            .get(&format!("/documents/sessions/{session_id}"))
            .await?;
        Ok(listing.into_vec())
    }
}

fn upload_form(file: UploadFile, description: Option<&str>) -> ApiResult<Form> {
    let mut form = Form::new().part("file", file.into_part()?);
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        form = form.text("description", description.to_string());
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn doc_json(id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "filename": "stored.pdf",
            "original_filename": "notes.pdf",
            "file_type": "application/pdf",
            "file_size": 3,
            "processing_status": "pending"
        })
    }

    #[tokio::test]
    async fn test_upload_sends_file_and_description() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documents/classes/7/upload"))
            .and(body_string_contains("name=\"file\"; filename=\"notes.pdf\""))
            .and(body_string_contains("name=\"description\""))
            .and(body_string_contains("Week 2"))
            .respond_with(ResponseTemplate::new(201).set_body_json(doc_json(1)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let file = UploadFile::new("notes.pdf", "application/pdf", b"pdf".to_vec());
        let doc = api
            .documents()
            .upload_to_class(7, file, Some("Week 2"))
            .await
            .unwrap();

        assert_eq!(doc.filename, "notes.pdf");
    }

    #[tokio::test]
    async fn test_youtube_upload_is_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/documents/classes/7/upload-youtube"))
            .and(body_json(serde_json::json!({
                "url": "https://youtu.be/dQw4w9WgXcQ",
                "description": null
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 2,
                "filename": "video.txt",
                "file_type": "youtube",
                "file_size": 0,
                "url": "https://youtu.be/dQw4w9WgXcQ"
            })))
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let doc = api
            .documents()
            .upload_youtube(7, "https://youtu.be/dQw4w9WgXcQ", None)
            .await
            .unwrap();
        assert!(doc.is_video());
    }

    #[tokio::test]
    async fn test_list_for_class_unwraps_documents() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/documents/classes/7"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"documents": [doc_json(1), doc_json(2)]})),
            )
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        let docs = api.documents().list_for_class(7).await.unwrap();
        assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_update_description_and_delete() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/documents/5"))
            .and(body_json(serde_json::json!({"description": "Updated"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(doc_json(5)))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/documents/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = ApiClient::new(mock_server.uri()).unwrap();
        api.documents()
            .update_description(5, Some("Updated"))
            .await
            .unwrap();
        api.documents().delete(5).await.unwrap();
    }
}
