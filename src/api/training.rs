use crate::api::analytics::require_object_id;
use crate::api::inspection::require_files;
use crate::api::types::TrainingOutcome;
use crate::client::{ApiRequest, FilePart, Gateway, Payload};
use crate::error::ApiError;

/// Training of per-object inspection profiles.
#[derive(Debug, Clone)]
pub struct TrainingApi {
    gateway: Gateway,
}

impl TrainingApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Train the object's profile on a set of reference images.
    ///
    /// A zero-file call never reaches the network; it is rejected
    /// client-side as a validation error.
    pub async fn train(
        &self,
        object_id: &str,
        files: Vec<FilePart>,
    ) -> Result<TrainingOutcome, ApiError> {
        require_object_id(object_id)?;
        require_files(&files)?;

        let request = ApiRequest::post(
            format!("/objects/{object_id}/train"),
            "training failed",
        )
        .with_payload(Payload::MultipartMany(files));

        self.gateway.send_json(request).await
    }
}
