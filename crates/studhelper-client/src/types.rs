//! # API Types
//!
//! Request payloads and response envelopes that only exist on the wire.

use std::collections::BTreeMap;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use studhelper_types::UserProfile;

use crate::error::ApiResult;

// ==================== Authentication Types ====================

/// Body of `POST /auth/login`. The server calls the email `username`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Body of `POST /auth/firebase-login`.
///
/// `username` and `full_name` are only sent on first sign-in, when the
/// backend creates the account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FirebaseLoginRequest {
    pub id_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl From<&str> for FirebaseLoginRequest {
    fn from(id_token: &str) -> Self {
        Self {
            id_token: id_token.to_string(),
            ..Default::default()
        }
    }
}

/// Token issued by the login endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

// ==================== Class & Document Types ====================

/// Body of `POST /classes/join`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct JoinClassRequest<'a> {
    pub class_code: &'a str,
}

/// Body of `POST /documents/classes/{id}/upload-youtube`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct YouTubeRequest<'a> {
    pub url: &'a str,
    pub description: Option<&'a str>,
}

/// Body of `PUT /documents/{id}`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateDocumentRequest<'a> {
    pub description: Option<&'a str>,
}

/// A file held in memory, ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    /// Creates an upload from raw bytes.
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::File`] if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn into_part(self) -> ApiResult<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(&self.mime_type)?)
    }
}

/// An external video reference attached when creating a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub url: String,
    pub description: Option<String>,
}

/// Everything needed to create a class in one request.
#[derive(Debug, Clone, Default)]
pub struct CreateClassData {
    pub name: String,
    pub description: Option<String>,
    pub files: Vec<UploadFile>,
    /// Optional descriptions keyed by filename.
    pub file_descriptions: BTreeMap<String, String>,
    pub videos: Vec<VideoRef>,
}

impl CreateClassData {
    /// Starts a payload with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builds the multipart form.
    ///
    /// Fields: `name`, `description`, repeated `files`, and when non-empty
    /// `file_descriptions` (JSON object), `youtube_urls` and
    /// `youtube_descriptions` (index-aligned JSON arrays; missing
    /// descriptions are sent as empty strings).
    pub(crate) fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new().text("name", self.name);

        if let Some(description) = self.description {
            form = form.text("description", description);
        }

        for file in self.files {
            form = form.part("files", file.into_part()?);
        }

        if !self.file_descriptions.is_empty() {
            form = form.text("file_descriptions", to_json(&self.file_descriptions));
        }

        if !self.videos.is_empty() {
            let (urls, descriptions): (Vec<String>, Vec<String>) = self
                .videos
                .into_iter()
                .map(|v| (v.url, v.description.unwrap_or_default()))
                .unzip();
            form = form
                .text("youtube_urls", to_json(&urls))
                .text("youtube_descriptions", to_json(&descriptions));
        }

        Ok(form)
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    // Maps and vectors of strings always serialize.
    serde_json::to_string(value).unwrap_or_default()
}

// ==================== Chat Types ====================

/// Body of `POST /chat/sessions`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateSessionRequest<'a> {
    pub title: &'a str,
    pub class_id: u64,
}

/// Body of `POST /chat/sessions/{id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub content: &'a str,
}

// ==================== Envelopes ====================

/// List responses come either bare or wrapped in a named field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Classes { classes: Vec<T> },
    Documents { documents: Vec<T> },
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Classes { classes: items } | Self::Documents { documents: items } => {
                items
            }
        }
    }
}
