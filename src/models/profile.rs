//! Positional selector profiles for the commission tables.

use std::collections::BTreeSet;

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Placeholder for the 1-based row number in a cell template.
pub const ROW_PLACEHOLDER: &str = "{row}";

/// Placeholder for the 1-based column number in a cell template.
pub const COL_PLACEHOLDER: &str = "{col}";

/// Where the parts of one table live on a page.
///
/// All paths are CSS selectors. The `*_cell` fields are templates carrying
/// `{row}` and `{col}` placeholders that are substituted with the page's
/// native 1-based numbering before the selector is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorProfile {
    /// Selects one element per table row; its text is the row header
    pub row_header: String,

    /// Selects one element per data column; its text is the column header.
    /// Absent for tables whose columns are fixed (see `fixed_columns`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_header: Option<String>,

    /// Template for the row total, read from a table separate from the cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cell: Option<String>,

    /// Template for a data cell
    pub cell: String,

    /// Column the row total is read from
    #[serde(default = "default_total_column")]
    pub total_column: usize,

    /// Columns read when there is no `col_header`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_columns: Vec<FixedColumn>,

    /// Cells carry a trailing `%` that is stripped before parsing
    #[serde(default)]
    pub percent: bool,
}

/// A data column at a known position with a known label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedColumn {
    pub index: usize,
    pub label: String,
}

fn default_total_column() -> usize {
    3
}

impl SelectorProfile {
    /// Profile for a results-shaped table: headed columns plus a row total.
    pub fn headed(
        row_header: impl Into<String>,
        col_header: impl Into<String>,
        total_cell: impl Into<String>,
        cell: impl Into<String>,
    ) -> Self {
        Self {
            row_header: row_header.into(),
            col_header: Some(col_header.into()),
            total_cell: Some(total_cell.into()),
            cell: cell.into(),
            total_column: default_total_column(),
            fixed_columns: Vec::new(),
            percent: false,
        }
    }

    /// Profile for a percentage table read at fixed column positions.
    pub fn fixed(
        row_header: impl Into<String>,
        cell: impl Into<String>,
        columns: &[(usize, &str)],
    ) -> Self {
        Self {
            row_header: row_header.into(),
            col_header: None,
            total_cell: None,
            cell: cell.into(),
            total_column: default_total_column(),
            fixed_columns: columns
                .iter()
                .map(|&(index, label)| FixedColumn {
                    index,
                    label: label.to_string(),
                })
                .collect(),
            percent: true,
        }
    }

    /// Selector for the data cell at (`row`, `col`), both 1-based.
    pub fn cell_selector(&self, row: usize, col: usize) -> Result<Selector> {
        parse_selector(&expand(&self.cell, row, col))
    }

    /// Selector for the total of `row`, if this table has totals.
    pub fn total_selector(&self, row: usize) -> Result<Option<Selector>> {
        self.total_cell
            .as_deref()
            .map(|template| parse_selector(&expand(template, row, self.total_column)))
            .transpose()
    }

    /// Check that every path and template parses.
    pub fn validate(&self) -> Result<()> {
        parse_selector(&self.row_header)?;
        if let Some(col_header) = &self.col_header {
            parse_selector(col_header)?;
        } else if self.fixed_columns.is_empty() {
            return Err(AppError::config(
                "profile needs either col_header or fixed_columns",
            ));
        }
        if !self.cell.contains(ROW_PLACEHOLDER) {
            return Err(AppError::selector(&self.cell, "cell template has no {row}"));
        }
        self.cell_selector(1, 1)?;
        if let Some(total) = &self.total_cell {
            if !total.contains(ROW_PLACEHOLDER) {
                return Err(AppError::selector(total, "total template has no {row}"));
            }
        }
        self.total_selector(1)?;
        Ok(())
    }
}

/// The "important rows" window of a table.
///
/// Rows `first_stat..last_stat` are the ballot statistics; rows from
/// `first_candidate` to the end are the per-candidate counts. The rows in
/// between (a blank separator on the commission pages) are skipped, as is
/// everything before `first_stat`. Indices are 0-based positions in the
/// row-header sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowWindow {
    pub first_stat: usize,
    pub last_stat: usize,
    pub first_candidate: usize,
}

impl RowWindow {
    /// Window with no statistics block: every row from `first` onwards.
    pub fn tail(first: usize) -> Self {
        Self {
            first_stat: first,
            last_stat: first,
            first_candidate: first,
        }
    }

    /// Row positions to materialize for a table with `row_count` rows, in
    /// source order and without duplicates.
    pub fn indices(&self, row_count: usize) -> Vec<usize> {
        let stats = self.first_stat..self.last_stat.min(row_count);
        let candidates = self.first_candidate..row_count;
        stats
            .chain(candidates)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Substitute the row and column placeholders of a template.
pub fn expand(template: &str, row: usize, col: usize) -> String {
    template
        .replace(ROW_PLACEHOLDER, &row.to_string())
        .replace(COL_PLACEHOLDER, &col.to_string())
}

/// Parse a CSS selector, mapping failures to a configuration error.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
