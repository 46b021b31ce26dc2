//! Error types for tenusage
//!
//! This module defines the error types used throughout the tenusage library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! The taxonomy follows the failure classes of the reporting pipeline:
//! client-caused validation errors, authorization denials, data-integrity
//! violations from upstream records, and collaborator lookup failures. None
//! of these are retried; this module only classifies and propagates.

use thiserror::Error;

use crate::types::{FlavorId, InstanceId};
use crate::window::ACCEPTED_FORMATS;

/// Main error type for tenusage operations
#[derive(Error, Debug)]
pub enum UsageError {
    /// A supplied timestamp matched none of the accepted textual layouts
    #[error("invalid datetime format {0:?}, valid formats are {formats:?}", formats = ACCEPTED_FORMATS)]
    InvalidDatetime(String),

    /// The requested window start does not precede its end
    #[error("invalid start time, the start time cannot occur after the end time")]
    StartAfterStop,

    /// The caller lacks permission for the requested report
    #[error("not authorized: {0}")]
    Forbidden(String),

    /// A live instance record carries no embedded flavor snapshot
    ///
    /// Only soft-deleted legacy records may fall back to the catalog; a live
    /// record without a snapshot signals upstream data corruption.
    #[error("instance {0} has no flavor snapshot and is not deleted")]
    MissingFlavorSnapshot(InstanceId),

    /// The flavor catalog has no entry for the requested id
    #[error("flavor {0} not found in catalog")]
    FlavorNotFound(FlavorId),

    /// The instance store failed to answer a window query
    #[error("instance store error: {0}")]
    Store(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in tenusage
///
/// # Example
///
/// ```
/// use tenusage::Result;
///
/// fn process_report() -> Result<String> {
///     Ok("report complete".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, UsageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = UsageError::StartAfterStop;
        assert_eq!(
            error.to_string(),
            "invalid start time, the start time cannot occur after the end time"
        );
    }

    #[test]
    fn test_invalid_datetime_names_formats() {
        let error = UsageError::InvalidDatetime("not-a-date".to_string());
        let msg = error.to_string();
        assert!(msg.contains("not-a-date"));
        assert!(msg.contains("%Y-%m-%dT%H:%M:%S"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let usage_error: UsageError = io_error.into();
        assert!(matches!(usage_error, UsageError::Io(_)));
    }
}
