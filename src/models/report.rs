//! Report kinds, page patterns, hierarchy levels and site eras.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Which table a record was extracted from.
///
/// The serialized tag is the `data_type` field of every emitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReportKind {
    /// Region-level results table, one column per territorial commission
    #[serde(rename = "results_tik")]
    ResultsTerritory,

    /// Territory-level results table, one column per polling station
    #[serde(rename = "results_uik")]
    ResultsStation,

    /// Region-level turnout table, one row per territorial commission
    #[serde(rename = "turnout_tik")]
    TurnoutTerritory,

    /// Territory-level turnout table, one row per polling station
    #[serde(rename = "turnout_uik")]
    TurnoutStation,

    /// Party-list results, region level
    #[serde(rename = "federal_tik")]
    Federal,

    /// Party-list results, station level
    #[serde(rename = "federal_uik")]
    FederalStation,

    /// Single-mandate district results, region level
    #[serde(rename = "single_mandate_tik")]
    SingleMandate,

    /// Single-mandate district results, station level
    #[serde(rename = "single_mandate_uik")]
    SingleMandateStation,
}

impl ReportKind {
    pub const ALL: [ReportKind; 8] = [
        ReportKind::ResultsTerritory,
        ReportKind::ResultsStation,
        ReportKind::TurnoutTerritory,
        ReportKind::TurnoutStation,
        ReportKind::Federal,
        ReportKind::FederalStation,
        ReportKind::SingleMandate,
        ReportKind::SingleMandateStation,
    ];

    /// The serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::ResultsTerritory => "results_tik",
            ReportKind::ResultsStation => "results_uik",
            ReportKind::TurnoutTerritory => "turnout_tik",
            ReportKind::TurnoutStation => "turnout_uik",
            ReportKind::Federal => "federal_tik",
            ReportKind::FederalStation => "federal_uik",
            ReportKind::SingleMandate => "single_mandate_tik",
            ReportKind::SingleMandateStation => "single_mandate_uik",
        }
    }

    /// Hierarchy level of the page carrying this table.
    pub fn level(&self) -> Level {
        match self {
            ReportKind::ResultsTerritory
            | ReportKind::TurnoutTerritory
            | ReportKind::Federal
            | ReportKind::SingleMandate => Level::Region,
            ReportKind::ResultsStation
            | ReportKind::TurnoutStation
            | ReportKind::FederalStation
            | ReportKind::SingleMandateStation => Level::Station,
        }
    }

    pub fn is_turnout(&self) -> bool {
        matches!(
            self,
            ReportKind::TurnoutTerritory | ReportKind::TurnoutStation
        )
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::config(format!("unknown report kind '{s}'")))
    }
}

/// Kind of link recognised on a region home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Summary table of the voting results
    Results,
    /// Preliminary turnout figures
    Turnout,
    /// Results for the federal (party-list) district
    Federal,
    /// Results for the single-mandate district
    SingleMandate,
}

impl PatternKind {
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Results,
        PatternKind::Turnout,
        PatternKind::Federal,
        PatternKind::SingleMandate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Results => "results",
            PatternKind::Turnout => "turnout",
            PatternKind::Federal => "federal",
            PatternKind::SingleMandate => "single_mandate",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        PatternKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::config(format!("unknown page pattern '{s}'")))
    }
}

/// Depth of a page in the commission hierarchy, as far as its layout goes.
///
/// Station-level pages are nested one table deeper than region-level ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Region,
    Station,
}

/// Layout generation of the commission site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SiteEra {
    /// Presidential election of 2018: results and turnout links
    #[default]
    #[serde(rename = "presidential_2018")]
    Presidential2018,

    /// State Duma election of 2016: federal, single-mandate and turnout links
    #[serde(rename = "duma_2016")]
    Duma2016,
}

impl SiteEra {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteEra::Presidential2018 => "presidential_2018",
            SiteEra::Duma2016 => "duma_2016",
        }
    }
}

impl fmt::Display for SiteEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteEra {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "presidential_2018" => Ok(SiteEra::Presidential2018),
            "duma_2016" => Ok(SiteEra::Duma2016),
            other => Err(AppError::config(format!("unknown site era '{other}'"))),
        }
    }
}
