//! Trait seam between the export pipeline and the remote service.
//!
//! The pipeline only ever talks to the service through [`DocumentApi`],
//! so tests can drive it with generated mocks instead of a live instance.
//! The real implementation is [`crate::api::PaperlessClient`].

use std::collections::HashMap;

use async_trait::async_trait;
use mockall::automock;

use crate::api::RefEndpoint;
use crate::error::ApiError;
use crate::model::{Document, FieldSchema};

/// Everything the export pipeline needs from the document service.
///
/// The two reference loaders are all-or-nothing and fatal on failure; the
/// document operations degrade at document granularity and the caller is
/// expected to handle their errors locally.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Complete `tag id -> name` mapping.
    async fn load_tags(&self) -> Result<HashMap<u64, String>, ApiError>;

    /// Complete custom-field schema.
    async fn load_custom_fields(&self) -> Result<HashMap<u64, FieldSchema>, ApiError>;

    /// All documents, optionally restricted to those carrying one tag.
    /// Returns a partial set when a page fails.
    async fn list_documents(&self, tag: Option<u64>) -> Vec<Document>;

    /// Full per-document record, including the custom-field list.
    async fn get_document(&self, id: u64) -> Result<serde_json::Value, ApiError>;

    /// Raw binary content of a document.
    async fn download_document(&self, id: u64) -> Result<Vec<u8>, ApiError>;

    /// Display name behind a reference id.
    async fn lookup_name(&self, endpoint: RefEndpoint, id: u64) -> Result<String, ApiError>;
}
