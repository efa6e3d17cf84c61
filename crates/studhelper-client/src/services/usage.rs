//! Usage endpoints.

use studhelper_types::{ClassId, ClassUsageOverview, UsageStats};

use crate::error::ApiResult;
use crate::gateway::ApiClient;

/// `/usage/*` endpoints.
pub struct UsageService<'a> {
    api: &'a ApiClient,
}

impl<'a> UsageService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// The current user's usage in every class.
    pub async fn my_usage(&self) -> ApiResult<Vec<UsageStats>> {
        self.api.get("/usage/my-usage").await
    }

    /// Per-member usage in a class (managers only).
    pub async fn class_members(&self, class_id: ClassId) -> ApiResult<Vec<ClassUsageOverview>> {
        self.api
            .get(&format!("/usage/classes/{class_id}/members"))
            .await
    }

    /// The current user's limits and usage in a class.
    pub async fn class_limits(&self, class_id: ClassId) -> ApiResult<UsageStats> {
        self.api
            .get(&format!("/usage/classes/{class_id}/limits"))
            .await
    }
}
