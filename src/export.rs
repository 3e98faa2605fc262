//! Orchestration of a full tag export run.
//!
//! Sequence: custom-field schema, tag list, tag-name resolution, output
//! directory purge, document fetch, then one pass per document building
//! the report row and writing both artifacts. Strictly sequential — the
//! only state crossing document boundaries is the row accumulator and the
//! resolver cache.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::api::RefEndpoint;
use crate::artifacts;
use crate::config::ExportConfig;
use crate::contract::DocumentApi;
use crate::error::ExportError;
use crate::model::Document;
use crate::report::{ReportBuilder, ReportRow};
use crate::resolve::{self, NameResolver};

/// Summary of one export run, printed by the CLI.
#[derive(Debug)]
pub struct ExportReport {
    pub tag: String,
    pub documents: Vec<DocumentReport>,
    pub report_path: PathBuf,
}

/// Per-document outcome. `pdf_written` is false when the binary download
/// failed and the document only has its metadata artifact.
#[derive(Debug)]
pub struct DocumentReport {
    pub id: u64,
    pub title: String,
    pub pdf_written: bool,
}

/// Run the export pipeline against `api` as configured.
pub async fn export<A: DocumentApi>(
    api: &A,
    config: &ExportConfig,
) -> Result<ExportReport, ExportError> {
    info!(tag = %config.tag, base_url = %config.base_url, "Starting export run");

    // Reference data first: downstream resolution is meaningless without
    // the complete schema, so any failure here aborts the run.
    let schema = api.load_custom_fields().await.map_err(ExportError::Schema)?;
    let tags = api.load_tags().await.map_err(ExportError::Schema)?;

    let tag_id = tags
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(&config.tag))
        .map(|(id, _)| *id)
        .ok_or_else(|| ExportError::UnknownTag(config.tag.clone()))?;

    let dir = artifacts::prepare_directory(&config.output_dir, &config.tag)?;

    let documents = api.list_documents(Some(tag_id)).await;
    info!(count = documents.len(), tag_id, "Fetched matching documents");

    let mut resolver = NameResolver::new(api);
    let mut report = ReportBuilder::new();
    let mut document_reports = Vec::new();

    for (index, summary) in documents.iter().enumerate() {
        if !summary.tags.contains(&tag_id) {
            continue;
        }
        println!("[{}/{}] {}", index + 1, documents.len(), summary.title);

        // The detail record carries the custom-field list the summary
        // omits; fall back to the summary when the detail call fails.
        let (doc, record) = match api.get_document(summary.id).await {
            Ok(record) => match serde_json::from_value::<Document>(record.clone()) {
                Ok(detailed) => (detailed, record),
                Err(e) => {
                    warn!(error = %e, id = summary.id, "Detail record did not parse, using summary");
                    (summary.clone(), record)
                }
            },
            Err(e) => {
                warn!(error = %e, id = summary.id, "Detail fetch failed, using summary record");
                (summary.clone(), serde_json::to_value(summary)?)
            }
        };

        let mut row = ReportRow::new();
        row.set("ID", doc.id.to_string());
        row.set("Title", doc.title.clone());
        row.set(
            "Correspondent",
            resolver
                .resolve(RefEndpoint::Correspondents, doc.correspondent)
                .await,
        );
        row.set(
            "Document type",
            resolver
                .resolve(RefEndpoint::DocumentTypes, doc.document_type)
                .await,
        );
        row.set(
            "Storage path",
            resolver
                .resolve(RefEndpoint::StoragePaths, doc.storage_path)
                .await,
        );
        row.set("Tags", resolve::format_tags(&doc.tags, &tags));
        row.set("Created", resolve::format_created(doc.created.as_deref()));
        for value in &doc.custom_fields {
            let (column, display) = resolve::format_custom_field(value, &schema, &config.currency);
            row.set(column, display);
        }

        let pdf_written = match api.download_document(doc.id).await {
            Ok(bytes) => {
                artifacts::write_pdf(&dir, &doc.title, &bytes)?;
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    id = doc.id,
                    title = %doc.title,
                    "Document download failed, skipping binary copy"
                );
                false
            }
        };
        artifacts::write_metadata(&dir, &doc.title, &record)?;

        report.push(row);
        document_reports.push(DocumentReport {
            id: doc.id,
            title: doc.title.clone(),
            pdf_written,
        });
    }

    let report_path = report.render(&dir, &config.tag, chrono::Local::now().date_naive())?;

    info!(
        documents = document_reports.len(),
        report = %report_path.display(),
        "Export complete"
    );
    Ok(ExportReport {
        tag: config.tag.clone(),
        documents: document_reports,
        report_path,
    })
}
