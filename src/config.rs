//! Runtime configuration consumed by the export pipeline.

use std::path::PathBuf;

use crate::resolve::CurrencyStyle;

/// Default page size for list requests against the remote service.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Fully merged configuration for one export run: static file settings
/// plus the token injected from the environment.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Base API endpoint, e.g. `https://paperless.example.com/api`.
    pub base_url: String,
    /// API token sent as `Authorization: Token ...` on every request.
    pub token: String,
    /// Root directory under which the tag-scoped export directory lives.
    pub output_dir: PathBuf,
    /// Display name of the tag to export.
    pub tag: String,
    /// Page size for list requests.
    pub page_size: usize,
    /// Rendering style for monetary custom fields.
    pub currency: CurrencyStyle,
}
