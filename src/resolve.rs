//! Resolution of raw identifiers into display values.
//!
//! Covers the three reference categories (correspondent, document type,
//! storage path), the document tag set, the creation timestamp and the
//! type-aware formatting of custom-field values.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::api::RefEndpoint;
use crate::contract::DocumentApi;
use crate::model::{CustomFieldValue, FieldSchema, FieldType};

/// Display value used when a reference cannot be resolved.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Explicit currency rendering style.
///
/// Passed as plain data instead of mutating process-wide locale state, so
/// formatting stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct CurrencyStyle {
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub symbol: String,
}

impl Default for CurrencyStyle {
    fn default() -> Self {
        Self {
            decimal_separator: ',',
            grouping_separator: '.',
            symbol: "€".to_string(),
        }
    }
}

impl CurrencyStyle {
    /// Render an amount of minor currency units, e.g. 2250 -> "22,50 €".
    pub fn format_minor_units(&self, minor: u64) -> String {
        let major = (minor / 100).to_string();
        let cents = minor % 100;
        let mut grouped = String::new();
        for (i, digit) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(digit);
        }
        format!(
            "{}{}{:02} {}",
            grouped, self.decimal_separator, cents, self.symbol
        )
    }
}

/// Strip everything but digits from a raw monetary value and render the
/// remainder as minor currency units. Digitless input falls back to the
/// zero amount.
pub fn format_monetary(raw: &str, style: &CurrencyStyle) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let minor = digits.parse::<u64>().unwrap_or(0);
    style.format_minor_units(minor)
}

/// Format one custom-field value using its schema definition.
///
/// Returns the report column name and the display value. A value whose
/// definition is missing gets the synthetic `Field <id>` column and its
/// raw rendering; a select index outside the choice table gets a
/// `Value <index>` placeholder. Neither is an error.
pub fn format_custom_field(
    value: &CustomFieldValue,
    schema: &HashMap<u64, FieldSchema>,
    style: &CurrencyStyle,
) -> (String, String) {
    let Some(definition) = schema.get(&value.field) else {
        warn!(
            field = value.field,
            "Custom-field value references an unknown definition"
        );
        return (format!("Field {}", value.field), raw_display(&value.value));
    };
    let display = match definition.data_type {
        FieldType::Monetary => format_monetary(&raw_display(&value.value), style),
        FieldType::Select => value
            .value
            .as_u64()
            .and_then(|index| definition.choices.get(&index).cloned())
            .unwrap_or_else(|| format!("Value {}", raw_display(&value.value))),
        FieldType::Plain => raw_display(&value.value),
    };
    (definition.name.clone(), display)
}

/// Comma-joined tag names in the document's stored order.
pub fn format_tags(tag_ids: &[u64], tags: &HashMap<u64, String>) -> String {
    tag_ids
        .iter()
        .map(|id| tags.get(id).cloned().unwrap_or_else(|| format!("Tag {id}")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an ISO-8601 creation timestamp as `DD.MM.YYYY`.
///
/// Accepts zone-qualified, `Z`-suffixed and naive forms; anything else
/// yields an empty cell.
pub fn format_created(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.date_naive())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|stamp| stamp.date())
        })
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => String::new(),
    }
}

/// Raw JSON value as a plain display string. Strings lose their quotes,
/// null becomes empty, everything else keeps its JSON rendering.
fn raw_display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Resolves reference ids to display names, caching results for the run.
///
/// The same correspondent or document type recurs across documents; one
/// lookup per id is enough for a single export. Failed lookups are cached
/// too — there is no retry policy anywhere in the pipeline.
pub struct NameResolver<'a, A: DocumentApi> {
    api: &'a A,
    cache: HashMap<(RefEndpoint, u64), String>,
}

impl<'a, A: DocumentApi> NameResolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            cache: HashMap::new(),
        }
    }

    /// Display name for `id`, or [`UNKNOWN_NAME`] when the id is absent or
    /// the lookup fails. Never fatal: a missing correspondent must not
    /// block the rest of the row.
    pub async fn resolve(&mut self, endpoint: RefEndpoint, id: Option<u64>) -> String {
        let Some(id) = id else {
            return UNKNOWN_NAME.to_string();
        };
        if let Some(name) = self.cache.get(&(endpoint, id)) {
            return name.clone();
        }
        let name = match self.api.lookup_name(endpoint, id).await {
            Ok(name) => name,
            Err(e) => {
                warn!(
                    error = %e,
                    endpoint = endpoint.path(),
                    id,
                    "Reference lookup failed, using sentinel"
                );
                UNKNOWN_NAME.to_string()
            }
        };
        self.cache.insert((endpoint, id), name.clone());
        name
    }
}
