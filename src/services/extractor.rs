//! Table extraction service.
//!
//! Reads a position-addressed commission table into an `ExtractedTable`.
//! Column and row counts vary per page; the output always keeps its grid in
//! step with its header sequences, and a cell that is present but not
//! numeric becomes `BAD_VALUE` instead of failing the page.

use crate::error::Result;
use crate::models::{
    BAD_VALUE, ExtractedTable, Page, ReportKind, RowWindow, SelectorProfile, SiteLayout,
    parse_selector,
};

/// Column header of the row-total column.
pub const TOTAL_LABEL: &str = "Сумма";

/// A data column: its 1-based page position and its label.
struct Column {
    index: usize,
    label: String,
}

/// Extracts one kind of table according to its selector profile.
pub struct TableExtractor<'a> {
    kind: ReportKind,
    profile: &'a SelectorProfile,
    window: &'a RowWindow,
}

impl<'a> TableExtractor<'a> {
    pub fn new(kind: ReportKind, profile: &'a SelectorProfile, window: &'a RowWindow) -> Self {
        Self {
            kind,
            profile,
            window,
        }
    }

    /// Extractor for `kind` as the layout defines it.
    ///
    /// Fails with a configuration error when the layout has no profile for
    /// the kind.
    pub fn for_kind(layout: &'a SiteLayout, kind: ReportKind) -> Result<Self> {
        Ok(Self::new(kind, layout.profile(kind)?, layout.rows(kind)))
    }

    /// Extract the table from `page`.
    ///
    /// Only the rows in the important-row window are materialized. Selectors
    /// that match nothing yield empty dimensions, not errors.
    pub fn extract(&self, page: &Page) -> Result<ExtractedTable> {
        let all_rows = page.select_texts(&parse_selector(&self.profile.row_header)?);
        log::debug!("{} row headers: {:?}", self.kind, all_rows);

        let columns = self.columns(page)?;
        log::debug!("{} columns: {}", self.kind, columns.len());

        let rows = self.window.indices(all_rows.len());

        let mut column_headers = Vec::with_capacity(columns.len() + 1);
        if self.profile.total_cell.is_some() {
            column_headers.push(TOTAL_LABEL.to_string());
        }
        column_headers.extend(columns.iter().map(|column| column.label.clone()));

        let mut cells = Vec::with_capacity(rows.len());
        for &row in &rows {
            // Page rows are 1-based.
            let page_row = row + 1;
            let mut values = Vec::with_capacity(column_headers.len());

            if let Some(total) = self.profile.total_selector(page_row)? {
                values.push(parse_value(&page.select_text(&total), self.profile.percent));
            }
            for column in &columns {
                let selector = self.profile.cell_selector(page_row, column.index)?;
                values.push(parse_value(
                    &page.select_text(&selector),
                    self.profile.percent,
                ));
            }
            cells.push(values);
        }

        let row_headers = rows.iter().map(|&row| all_rows[row].clone()).collect();

        Ok(ExtractedTable {
            row_headers,
            column_headers,
            cells,
            report_kind: self.kind,
        })
    }

    fn columns(&self, page: &Page) -> Result<Vec<Column>> {
        let columns = match &self.profile.col_header {
            Some(path) => page
                .select_texts(&parse_selector(path)?)
                .into_iter()
                .enumerate()
                .map(|(i, label)| Column {
                    index: i + 1,
                    label,
                })
                .collect(),
            None => self
                .profile
                .fixed_columns
                .iter()
                .map(|column| Column {
                    index: column.index,
                    label: column.label.clone(),
                })
                .collect(),
        };
        Ok(columns)
    }
}

/// Parse a cell's text as a number, or `BAD_VALUE` if it is not one.
///
/// With `percent`, one trailing `%` is removed first.
pub fn parse_value(raw: &str, percent: bool) -> f64 {
    let text = raw.trim();
    let text = if percent {
        text.strip_suffix('%').unwrap_or(text).trim_end()
    } else {
        text
    };
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(BAD_VALUE)
}
