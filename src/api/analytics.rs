use crate::api::types::AnalyticsSummary;
use crate::client::{ApiRequest, Gateway};
use crate::error::ApiError;

/// Per-object inspection statistics, computed server-side.
#[derive(Debug, Clone)]
pub struct AnalyticsApi {
    gateway: Gateway,
}

impl AnalyticsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Fetch the summary for one object. Not cached; every call hits the
    /// service.
    pub async fn summary(&self, object_id: &str) -> Result<AnalyticsSummary, ApiError> {
        require_object_id(object_id)?;
        self.gateway
            .send_json(ApiRequest::get(
                format!("/objects/{object_id}/analytics"),
                "analytics fetch failed",
            ))
            .await
    }
}

pub(crate) fn require_object_id(object_id: &str) -> Result<(), ApiError> {
    if object_id.trim().is_empty() {
        return Err(ApiError::Validation("object id must not be empty".to_string()));
    }
    Ok(())
}
