//! Prediction oracle client
//!
//! Best-effort remote vulnerability predictor. The client POSTs sanitized
//! source to a configured endpoint and folds high-confidence candidates into
//! the finding list; every failure mode (timeout, transport, status, decode)
//! is absorbed into "no additional findings" and never alters control flow.

mod client;

pub use client::{OracleClient, OracleOutcome};

use thiserror::Error;

/// Errors internal to the oracle client. These never escape
/// [`OracleClient::predict`]; the enum exists so the failure paths stay
/// typed and loggable.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    RequestFailed(String),

    #[error("oracle returned status {0}")]
    BadStatus(u16),

    #[error("failed to decode oracle response: {0}")]
    Decode(String),
}
