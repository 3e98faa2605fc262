//! Tabular report accumulation and styled spreadsheet rendering.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, Workbook};
use tracing::info;

use crate::error::ExportError;

/// Solid accent fill behind the bold white header text.
const HEADER_FILL: u32 = 0x4F81BD;

/// One report row: insertion-ordered `column -> display value` mapping.
///
/// Rows carry only the cells they actually have; a document without a
/// given custom field simply never sets that column.
#[derive(Debug, Default, Clone)]
pub struct ReportRow {
    cells: Vec<(String, String)>,
}

impl ReportRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. A repeated column keeps its original position and takes
    /// the new value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

/// Accumulates one row per exported document and renders the final
/// spreadsheet.
///
/// No column schema is declared up front: the header is the ordered union
/// of the keys observed across all rows, each column appearing where it
/// was first encountered.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    rows: Vec<ReportRow>,
    columns: Vec<String>,
    seen: HashSet<String>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ReportRow) {
        for column in row.columns() {
            if self.seen.insert(column.to_string()) {
                self.columns.push(column.to_string());
            }
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ordered union of the columns observed so far.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render one styled header row plus one row per document, in the
    /// order the rows were pushed. The filename embeds the tag and `date`.
    pub fn render(&self, dir: &Path, tag: &str, date: NaiveDate) -> Result<PathBuf, ExportError> {
        let filename = format!("export-{}-{}.xlsx", tag, date.format("%Y%m%d"));
        let path = dir.join(filename);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet().set_name("Documents")?;

        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL));

        for (col, column) in self.columns.iter().enumerate() {
            sheet.write_with_format(0, col as u16, column, &header_format)?;
        }
        for (row_index, row) in self.rows.iter().enumerate() {
            for (col_index, column) in self.columns.iter().enumerate() {
                if let Some(value) = row.get(column) {
                    sheet.write((row_index + 1) as u32, col_index as u16, value)?;
                }
            }
        }
        workbook.save(&path)?;
        info!(path = %path.display(), rows = self.rows.len(), "Wrote spreadsheet report");
        Ok(path)
    }
}
