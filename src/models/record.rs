//! Extracted tables and the records emitted for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ReportKind;

/// Stands in for a cell whose text is present but is not a number.
///
/// Every real value is a non-negative count or percentage, so this can never
/// collide with data.
pub const BAD_VALUE: f64 = -1.0;

/// A table read off one page.
///
/// `cells` has one row per entry of `row_headers` and one value per entry
/// of `column_headers` in every row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub row_headers: Vec<String>,
    pub column_headers: Vec<String>,
    pub cells: Vec<Vec<f64>>,
    pub report_kind: ReportKind,
}

impl ExtractedTable {
    /// Whether the grid matches both header sequences.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.row_headers.len()
            && self
                .cells
                .iter()
                .all(|row| row.len() == self.column_headers.len())
    }
}

/// Names of the commissions a page belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIdentity {
    pub region_name: String,
    pub area_committee_name: Option<String>,
    pub territory_name: Option<String>,
}

/// One line of output.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_committee: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,

    pub row_headers: Vec<String>,
    pub column_headers: Vec<String>,
    pub data: Vec<Vec<f64>>,
    pub data_type: ReportKind,
    pub timestamp: DateTime<Utc>,
    pub url: String,

    /// Hex MD5 of the raw page bytes
    pub md5: String,
}

impl Record {
    /// Serialize as a single JSON line, without the trailing newline.
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
