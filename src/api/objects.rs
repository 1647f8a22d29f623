use crate::api::types::InspectionObject;
use crate::client::{ApiRequest, Gateway};
use crate::error::ApiError;

/// Registry of inspection objects.
#[derive(Debug, Clone)]
pub struct ObjectsApi {
    gateway: Gateway,
}

impl ObjectsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Register a new object. The name travels as a query parameter; there
    /// is no body.
    ///
    /// The service echoes the id (as `id` or `object_id` depending on the
    /// revision) but not always the name, so the requested name fills the
    /// gap.
    pub async fn create(&self, name: &str) -> Result<InspectionObject, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("object name must not be empty".to_string()));
        }

        let request =
            ApiRequest::post("/objects", "object creation failed").with_query("name", name);
        let mut object: InspectionObject = self.gateway.send_json(request).await?;
        if object.name.is_empty() {
            object.name = name.to_string();
        }
        Ok(object)
    }

    /// List all registered objects.
    pub async fn list(&self) -> Result<Vec<InspectionObject>, ApiError> {
        self.gateway
            .send_json(ApiRequest::get("/objects", "object listing failed"))
            .await
    }
}
