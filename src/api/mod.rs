//! Domain adapters: one thin typed facade per capability area.
//!
//! Each adapter knows the endpoint, payload encoding, and response shape of
//! its operations, builds the request through the [`Gateway`], and normalizes
//! the heterogeneous wire responses into the types in [`types`]. Adapters
//! never swallow errors; transport and service failures propagate as
//! [`crate::error::ApiError`] with a displayable message.
//!
//! [`Gateway`]: crate::client::Gateway

mod analytics;
mod auth;
mod inspection;
mod objects;
mod training;
pub mod types;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use inspection::{InspectionApi, SingleInspection};
pub use objects::ObjectsApi;
pub use training::TrainingApi;
