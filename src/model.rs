//! Serde data model for the paperless-ngx REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Paginated list envelope shared by every list endpoint.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A user-defined label attachable to documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

/// Single-entity lookup response for correspondents, document types and
/// storage paths; only the display name matters here.
#[derive(Debug, Deserialize)]
pub struct NamedEntity {
    pub name: String,
}

/// Declared data type of a custom field. Everything the exporter does not
/// format specially is treated as plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Monetary,
    Select,
    #[serde(other)]
    Plain,
}

/// Custom-field definition as returned by the schema endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub id: u64,
    pub name: String,
    pub data_type: FieldType,
    #[serde(default)]
    pub extra_data: serde_json::Value,
}

impl CustomField {
    /// Ordered `choice index -> label` table for select fields.
    ///
    /// The service stores the options as a plain list; the index a document
    /// value carries is the position in that list.
    pub fn choices(&self) -> BTreeMap<u64, String> {
        self.extra_data
            .get("select_options")
            .and_then(|v| v.as_array())
            .map(|options| {
                options
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, option)| {
                        option.as_str().map(|label| (idx as u64, label.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Custom-field schema entry as consumed by the resolver.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub data_type: FieldType,
    pub choices: BTreeMap<u64, String>,
}

impl From<CustomField> for FieldSchema {
    fn from(field: CustomField) -> Self {
        let choices = field.choices();
        FieldSchema {
            name: field.name,
            data_type: field.data_type,
            choices,
        }
    }
}

/// One custom-field value attached to a document. The raw value's shape
/// depends on the definition's data type: numeric string for monetary,
/// integer index for select, opaque otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub field: u64,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// A document record. The list endpoint returns a summary whose
/// `custom_fields` is empty; the per-document detail endpoint fills it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub correspondent: Option<u64>,
    #[serde(default)]
    pub document_type: Option<u64>,
    #[serde(default)]
    pub storage_path: Option<u64>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldValue>,
}
