//! Pipeline tests against a mocked service seam.
//!
//! These drive `export` through `MockDocumentApi`, checking the failure
//! policies that are awkward to produce over real HTTP: fatal schema
//! loads, unknown tags, per-document download skips and the run-scoped
//! lookup cache.

use std::collections::{BTreeMap, HashMap};
use std::fs;

use mockall::predicate::eq;
use serde_json::json;
use tempfile::tempdir;

use paperless_export::api::RefEndpoint;
use paperless_export::config::ExportConfig;
use paperless_export::contract::MockDocumentApi;
use paperless_export::error::{ApiError, ExportError};
use paperless_export::export::export;
use paperless_export::model::{Document, FieldSchema, FieldType};
use paperless_export::resolve::CurrencyStyle;

fn test_config(output_dir: std::path::PathBuf) -> ExportConfig {
    ExportConfig {
        base_url: "http://unused.invalid/api".to_string(),
        token: "unused".to_string(),
        output_dir,
        tag: "Invoices".to_string(),
        page_size: 25,
        currency: CurrencyStyle::default(),
    }
}

fn schema() -> HashMap<u64, FieldSchema> {
    let mut map = HashMap::new();
    map.insert(
        1,
        FieldSchema {
            name: "Amount".to_string(),
            data_type: FieldType::Monetary,
            choices: BTreeMap::new(),
        },
    );
    map
}

fn tag_map() -> HashMap<u64, String> {
    let mut map = HashMap::new();
    map.insert(7, "Invoices".to_string());
    map.insert(8, "Receipts".to_string());
    map
}

fn summary(id: u64, title: &str, tags: Vec<u64>) -> Document {
    Document {
        id,
        title: title.to_string(),
        created: Some("2024-03-05T10:30:00Z".to_string()),
        correspondent: Some(1),
        document_type: None,
        storage_path: None,
        tags,
        custom_fields: vec![],
    }
}

fn detail_record(doc: &Document) -> serde_json::Value {
    let mut record = serde_json::to_value(doc).unwrap();
    record["custom_fields"] = json!([{ "field": 1, "value": "EUR2250" }]);
    record
}

#[tokio::test]
async fn schema_load_failure_aborts_the_run() {
    let tmp = tempdir().unwrap();
    let mut api = MockDocumentApi::new();
    api.expect_load_custom_fields().returning(|| {
        Err(ApiError::Status {
            endpoint: "http://paperless.invalid/api/custom_fields/".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        })
    });

    let err = export(&api, &test_config(tmp.path().to_path_buf()))
        .await
        .expect_err("schema failure must be fatal");

    assert!(matches!(err, ExportError::Schema(_)));
    let message = err.to_string();
    assert!(message.contains("custom_fields"), "got: {message}");
    assert!(message.contains("500"), "got: {message}");
}

#[tokio::test]
async fn unknown_tag_aborts_before_touching_the_filesystem() {
    let tmp = tempdir().unwrap();
    let mut api = MockDocumentApi::new();
    api.expect_load_custom_fields()
        .returning(|| Ok(HashMap::new()));
    api.expect_load_tags().returning(|| {
        let mut map = HashMap::new();
        map.insert(8, "Receipts".to_string());
        Ok(map)
    });

    let err = export(&api, &test_config(tmp.path().to_path_buf()))
        .await
        .expect_err("missing tag must be fatal");

    assert!(matches!(err, ExportError::UnknownTag(ref tag) if tag == "Invoices"));
    assert!(!tmp.path().join("export-Invoices").exists());
}

#[tokio::test]
async fn tag_name_matches_case_insensitively() {
    let tmp = tempdir().unwrap();
    let mut api = MockDocumentApi::new();
    api.expect_load_custom_fields()
        .returning(|| Ok(HashMap::new()));
    api.expect_load_tags().returning(|| {
        let mut map = HashMap::new();
        map.insert(7, "invoices".to_string());
        Ok(map)
    });
    api.expect_list_documents()
        .with(eq(Some(7u64)))
        .returning(|_| vec![]);

    let report = export(&api, &test_config(tmp.path().to_path_buf()))
        .await
        .expect("lowercase server tag must still match");

    assert!(report.documents.is_empty());
    assert!(tmp.path().join("export-Invoices").exists());
}

#[tokio::test]
async fn failed_download_skips_binary_but_keeps_metadata_and_row() {
    let tmp = tempdir().unwrap();
    let mut api = MockDocumentApi::new();
    api.expect_load_custom_fields().returning(|| Ok(schema()));
    api.expect_load_tags().returning(|| Ok(tag_map()));
    api.expect_list_documents()
        .with(eq(Some(7u64)))
        .returning(|_| {
            vec![
                summary(10, "Invoice March", vec![7]),
                summary(11, "Invoice April", vec![7, 8]),
            ]
        });
    api.expect_get_document()
        .with(eq(10u64))
        .returning(|_| Ok(detail_record(&summary(10, "Invoice March", vec![7]))));
    api.expect_get_document()
        .with(eq(11u64))
        .returning(|_| Ok(detail_record(&summary(11, "Invoice April", vec![7, 8]))));
    api.expect_download_document()
        .with(eq(10u64))
        .returning(|_| Ok(b"%PDF-1.4 fake".to_vec()));
    api.expect_download_document()
        .with(eq(11u64))
        .returning(|_| {
            Err(ApiError::Status {
                endpoint: "http://paperless.invalid/api/documents/11/download/".to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        });
    // Both documents share correspondent 1: the resolver must ask once.
    api.expect_lookup_name()
        .with(eq(RefEndpoint::Correspondents), eq(1u64))
        .times(1)
        .returning(|_, _| Ok("ACME GmbH".to_string()));

    let report = export(&api, &test_config(tmp.path().to_path_buf()))
        .await
        .expect("run must survive a failed download");

    assert_eq!(report.documents.len(), 2);
    assert!(report.documents[0].pdf_written);
    assert!(!report.documents[1].pdf_written);

    let dir = tmp.path().join("export-Invoices");
    assert!(dir.join("Invoice March.pdf").exists());
    assert!(dir.join("Invoice March.json").exists());
    assert!(!dir.join("Invoice April.pdf").exists());
    assert!(dir.join("Invoice April.json").exists());
}

#[tokio::test]
async fn documents_without_the_target_tag_are_skipped() {
    let tmp = tempdir().unwrap();
    let mut api = MockDocumentApi::new();
    api.expect_load_custom_fields().returning(|| Ok(schema()));
    api.expect_load_tags().returning(|| Ok(tag_map()));
    // The fetch layer may hand back an off-tag document; the pipeline
    // must not touch it, so no get_document/download expectations exist
    // for id 12.
    api.expect_list_documents()
        .with(eq(Some(7u64)))
        .returning(|_| {
            vec![
                summary(10, "Invoice March", vec![7]),
                summary(12, "Unrelated", vec![8]),
            ]
        });
    api.expect_get_document()
        .with(eq(10u64))
        .returning(|_| Ok(detail_record(&summary(10, "Invoice March", vec![7]))));
    api.expect_download_document()
        .with(eq(10u64))
        .returning(|_| Ok(b"%PDF-1.4 fake".to_vec()));
    api.expect_lookup_name()
        .returning(|_, _| Ok("ACME GmbH".to_string()));

    let report = export(&api, &test_config(tmp.path().to_path_buf()))
        .await
        .expect("run should succeed");

    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.documents[0].id, 10);
}

#[tokio::test]
async fn failed_detail_fetch_falls_back_to_summary_metadata() {
    let tmp = tempdir().unwrap();
    let mut api = MockDocumentApi::new();
    api.expect_load_custom_fields().returning(|| Ok(schema()));
    api.expect_load_tags().returning(|| Ok(tag_map()));
    api.expect_list_documents()
        .returning(|_| vec![summary(10, "Invoice March", vec![7])]);
    api.expect_get_document().with(eq(10u64)).returning(|_| {
        Err(ApiError::Status {
            endpoint: "http://paperless.invalid/api/documents/10/".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        })
    });
    api.expect_download_document()
        .returning(|_| Ok(b"%PDF-1.4 fake".to_vec()));
    api.expect_lookup_name()
        .returning(|_, _| Ok("ACME GmbH".to_string()));

    let report = export(&api, &test_config(tmp.path().to_path_buf()))
        .await
        .expect("detail failure degrades, never aborts");

    assert_eq!(report.documents.len(), 1);
    let metadata = fs::read_to_string(
        tmp.path()
            .join("export-Invoices")
            .join("Invoice March.json"),
    )
    .unwrap();
    let record: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(record["id"], 10);
    assert_eq!(record["title"], "Invoice March");
}
