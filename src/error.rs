//! Error taxonomy for the export pipeline.
//!
//! Three failure classes exist: fatal schema-load failures that abort the
//! run, document-granularity failures that degrade to placeholders or
//! skipped artifacts, and data-quality gaps that never surface as errors
//! at all. Only the first two need types; the third is handled inline by
//! the resolver.

use thiserror::Error;

/// Errors from the remote document service.
///
/// An HTTP-level failure and a malformed response body are distinct
/// conditions; diagnostics must be able to tell them apart.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    /// The request never produced a response.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body was not the JSON we expected.
    #[error("malformed response body from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// The endpoint the failing request was addressed to.
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Status { endpoint, .. }
            | ApiError::Transport { endpoint, .. }
            | ApiError::Malformed { endpoint, .. } => endpoint,
        }
    }
}

/// Errors that abort an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The tag list or custom-field schema could not be loaded completely.
    /// Downstream resolution is meaningless without it.
    #[error("failed to load reference data: {0}")]
    Schema(#[source] ApiError),

    /// The configured tag does not exist on the server.
    #[error("tag '{0}' not found")]
    UnknownTag(String),

    /// Filesystem failure while writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet rendering failed.
    #[error("report rendering failed: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    /// Metadata record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
