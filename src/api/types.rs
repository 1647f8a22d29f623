//! Wire types shared by the domain adapters.
//!
//! The remote contract has drifted across service versions: list endpoints
//! answer either a bare array or a wrapped object, batch items spell the
//! score field two ways, and object creation spells the id two ways. The
//! types here absorb all observed variants; anything outside them fails
//! loudly rather than defaulting to empty.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

// =============================================================================
// Classification
// =============================================================================

/// The service's binary verdict for an inspected image.
///
/// Casing on the wire is not guaranteed ("DEFECT", "defect", "Defect"), so
/// parsing is case-insensitive everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Normal,
    Defect,
}

impl Classification {
    /// Parse a wire verdict, ignoring case. Returns `None` for anything
    /// other than normal/defect.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("normal") {
            Some(Classification::Normal)
        } else if value.eq_ignore_ascii_case("defect") {
            Some(Classification::Defect)
        } else {
            None
        }
    }

    pub fn is_defect(self) -> bool {
        matches!(self, Classification::Defect)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Normal => "NORMAL",
            Classification::Defect => "DEFECT",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A registered item against which inspections and training are scoped.
/// Immutable once created.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InspectionObject {
    /// Object identifier; older service revisions send it as `object_id`.
    #[serde(alias = "object_id")]
    pub id: String,
    /// Display name; may be absent on the wire.
    #[serde(default)]
    pub name: String,
}

/// Server-derived inspection statistics for one object. Fetched on demand,
/// never cached client-side.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    pub total: u64,
    pub normal: u64,
    pub defect: u64,
    /// Defect share of all inspections, already in percent.
    #[serde(rename = "defect_rate")]
    pub defect_rate_percent: f64,
}

/// One entry of a batch inspection response.
///
/// Response order is not guaranteed to match submission order; treat the
/// list as a set keyed by `filename` for any cross-checking.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BatchItem {
    pub filename: String,
    /// Anomaly score; newer service revisions send it as `anomaly_score`.
    #[serde(alias = "anomaly_score")]
    pub score: f64,
    /// Verdict string as transmitted.
    pub result: String,
}

impl BatchItem {
    /// Case-insensitive verdict, if it is one of the known classifications.
    pub fn classification(&self) -> Option<Classification> {
        Classification::parse(&self.result)
    }
}

/// One past inspection, as recorded by the service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub filename: String,
    #[serde(alias = "anomaly_score")]
    pub score: f64,
    /// Verdict string as transmitted.
    pub result: String,
    /// ISO-8601 timestamp string; no ordering is implied.
    pub timestamp: String,
}

impl HistoryRecord {
    /// Case-insensitive verdict, if it is one of the known classifications.
    pub fn classification(&self) -> Option<Classification> {
        Classification::parse(&self.result)
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TrainingOutcome {
    pub images_used: u64,
}

// =============================================================================
// Dual-Shape Normalization
// =============================================================================

/// Extract a record list from a response that is either `{key: [...]}` or a
/// bare `[...]`.
///
/// The wrapped key is tried first, then the whole body as an array. Any
/// other shape is a hard error naming the failed operation: an unrecognized
/// response must never be mistaken for an empty result.
pub(crate) fn extract_records<T: DeserializeOwned>(
    body: Value,
    key: &str,
    category: &'static str,
) -> Result<Vec<T>, ApiError> {
    let items = match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => return Err(shape_error(category, key)),
        },
        Value::Array(items) => items,
        _ => return Err(shape_error(category, key)),
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| ApiError::Service {
                status: 200,
                detail: format!("{category}: unexpected record in response ({e})"),
            })
        })
        .collect()
}

fn shape_error(category: &str, key: &str) -> ApiError {
    ApiError::Service {
        status: 200,
        detail: format!("{category}: response is neither an array nor an object with {key:?}"),
    }
}

// =============================================================================
// Tests
// =============================================================================
