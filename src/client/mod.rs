//! Request gateway: the single chokepoint for all traffic to the
//! inspection service.
//!
//! Every outbound call goes through [`Gateway::send_json`] or
//! [`Gateway::send_binary`], which attach the bearer token, dispatch over the
//! [`Transport`] seam, and interpret failures uniformly. An authorization
//! failure on any call clears the session store and flips the session signal
//! before the error reaches the caller.

mod gateway;
mod request;
mod transport;

pub use gateway::{BinaryResponse, Gateway, HEADER_ANOMALY_SCORE, HEADER_RESULT};
pub use request::{ApiRequest, FilePart, Payload, FILES_FIELD, FILE_FIELD};
pub use transport::{HttpTransport, Transport};
