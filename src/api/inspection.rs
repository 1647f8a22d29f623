use bytes::Bytes;

use crate::api::analytics::require_object_id;
use crate::api::types::{extract_records, BatchItem, Classification, HistoryRecord};
use crate::client::{ApiRequest, FilePart, Gateway, Payload, HEADER_ANOMALY_SCORE, HEADER_RESULT};
use crate::error::ApiError;

/// Result of a single inspection: the annotated heatmap plus the score and
/// verdict the service carried in response headers.
#[derive(Debug, Clone)]
pub struct SingleInspection {
    /// Annotated heatmap image (PNG), as streamed by the service.
    pub image: Bytes,
    /// Anomaly score, decoded from its string-encoded header.
    pub score: f64,
    pub classification: Classification,
}

/// Single and batch inspections, and the per-object inspection history.
#[derive(Debug, Clone)]
pub struct InspectionApi {
    gateway: Gateway,
}

impl InspectionApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Inspect one image. The file goes up as the single multipart `file`
    /// field; the response is the annotated image with score and verdict in
    /// sidecar headers.
    pub async fn inspect(
        &self,
        object_id: &str,
        file: FilePart,
    ) -> Result<SingleInspection, ApiError> {
        require_object_id(object_id)?;
        require_file(&file)?;

        let request = ApiRequest::post(
            format!("/objects/{object_id}/inspect"),
            "inspection failed",
        )
        .with_payload(Payload::MultipartSingle(file));

        let response = self.gateway.send_binary(request).await?;

        let score = response.score.trim().parse::<f64>().map_err(|_| {
            ApiError::Service {
                status: 200,
                detail: format!(
                    "inspection failed: {HEADER_ANOMALY_SCORE} header is not a number ({:?})",
                    response.score
                ),
            }
        })?;

        let classification =
            Classification::parse(&response.result).ok_or_else(|| ApiError::Service {
                status: 200,
                detail: format!(
                    "inspection failed: {HEADER_RESULT} header is not a known verdict ({:?})",
                    response.result
                ),
            })?;

        Ok(SingleInspection {
            image: response.bytes,
            score,
            classification,
        })
    }

    /// Inspect several images in one call. Files go up under the repeated
    /// multipart `files` field; the response is a record list in either of
    /// the two known shapes (`[...]` or `{"results": [...]}`).
    ///
    /// Response order is preserved for display but is not guaranteed to
    /// match submission order.
    pub async fn inspect_batch(
        &self,
        object_id: &str,
        files: Vec<FilePart>,
    ) -> Result<Vec<BatchItem>, ApiError> {
        require_object_id(object_id)?;
        require_files(&files)?;

        let request = ApiRequest::post(
            format!("/objects/{object_id}/inspect-batch"),
            "batch inspection failed",
        )
        .with_payload(Payload::MultipartMany(files));

        let body: serde_json::Value = self.gateway.send_json(request).await?;
        extract_records(body, "results", "batch inspection failed")
    }

    /// Fetch the inspection history for one object, in either of the two
    /// known shapes (`[...]` or `{"history": [...]}`). Ordering is whatever
    /// the service returned.
    pub async fn history(&self, object_id: &str) -> Result<Vec<HistoryRecord>, ApiError> {
        require_object_id(object_id)?;

        let body: serde_json::Value = self
            .gateway
            .send_json(ApiRequest::get(
                format!("/objects/{object_id}/history"),
                "history fetch failed",
            ))
            .await?;
        extract_records(body, "history", "history fetch failed")
    }
}

fn require_file(file: &FilePart) -> Result<(), ApiError> {
    if file.bytes.is_empty() {
        return Err(ApiError::Validation(format!(
            "file {:?} is empty",
            file.filename
        )));
    }
    Ok(())
}

pub(crate) fn require_files(files: &[FilePart]) -> Result<(), ApiError> {
    if files.is_empty() {
        return Err(ApiError::Validation("no files selected".to_string()));
    }
    for file in files {
        require_file(file)?;
    }
    Ok(())
}
