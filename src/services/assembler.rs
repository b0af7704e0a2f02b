//! Record assembly.
//!
//! Joins an extracted table with the page it came from and the names of the
//! commissions the page belongs to.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ExtractedTable, IdentityPaths, Page, PageIdentity, Record, parse_selector};

/// Read the commission names at `paths` from `page`.
///
/// Optional names are `None` when their anchor is absent or has no text.
pub fn read_identity(page: &Page, paths: &IdentityPaths) -> Result<PageIdentity> {
    let read = |path: &str| -> Result<Option<String>> {
        let text = page.select_text(&parse_selector(path)?);
        Ok(Some(text).filter(|text| !text.is_empty()))
    };

    Ok(PageIdentity {
        region_name: read(&paths.region)?.unwrap_or_default(),
        area_committee_name: paths.area_committee.as_deref().map(read).transpose()?.flatten(),
        territory_name: paths.territory.as_deref().map(read).transpose()?.flatten(),
    })
}

/// Build the output record for one extracted table.
///
/// Deterministic given its inputs: the timestamp is passed in.
pub fn assemble(
    identity: PageIdentity,
    table: ExtractedTable,
    page: &Page,
    timestamp: DateTime<Utc>,
) -> Record {
    Record {
        region: identity.region_name,
        area_committee: identity.area_committee_name,
        territory: identity.territory_name,
        row_headers: table.row_headers,
        column_headers: table.column_headers,
        data: table.cells,
        data_type: table.report_kind,
        timestamp,
        url: page.url().to_string(),
        md5: page.fingerprint(),
    }
}
