//! Class endpoints.

use studhelper_types::{ClassId, ClassPatch, ClassRecord, Member};

use crate::error::ApiResult;
use crate::gateway::ApiClient;
use crate::types::{CreateClassData, JoinClassRequest, Listing};

/// `/classes/*` endpoints.
pub struct ClassService<'a> {
    api: &'a ApiClient,
}

impl<'a> ClassService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Classes the current user belongs to.
    pub async fn list(&self) -> ApiResult<Vec<ClassRecord>> {
        let listing: Listing<ClassRecord> = self.api.get("/classes").await?;
        Ok(listing.into_vec())
    }

    /// Creates a class with its initial files and videos in one multipart request.
    ///
    /// # Errors
    ///
    /// * [`crate::ApiError::Network`] - A part could not be built or the request failed
    /// * [`crate::ApiError::Server`] - Validation error (400/422)
    pub async fn create(&self, data: CreateClassData) -> ApiResult<ClassRecord> {
        tracing::debug!(
            name = %data.name,
            files = data.files.len(),
            videos = data.videos.len(),
            "Creating class"
        );
        let form = data.into_form()?;
        self.api.post_multipart("/classes", form).await
    }

    /// Class details including documents.
    pub async fn get(&self, id: ClassId) -> ApiResult<ClassRecord> {
        self.api.get(&format!("/classes/{id}")).await
    }

    /// Updates name and/or description (owner only).
    pub async fn update(&self, id: ClassId, patch: &ClassPatch) -> ApiResult<ClassRecord> {
        self.api.put(&format!("/classes/{id}"), patch).await
    }

    /// Deletes a class and everything in it (owner only).
    pub async fn delete(&self, id: ClassId) -> ApiResult<()> {
        self.api.delete(&format!("/classes/{id}")).await
    }

    /// Joins a class by its share code.
    pub async fn join(&self, class_code: &str) -> ApiResult<ClassRecord> {
        self.api
            .post("/classes/join", &JoinClassRequest { class_code })
            .await
    }

    /// Members of a class with their permissions.
    pub async fn members(&self, id: ClassId) -> ApiResult<Vec<Member>> {
        self.api.get(&format!("/classes/{id}/members")).await
    }
}
