//! Site layouts: everything the crawler knows about page positions.
//!
//! The commission site has no IDs or APIs, so every table, link and name is
//! located by its position in the document. Those positions changed between
//! elections; each era is a separate `SiteLayout` value, while the traversal
//! and extraction code stay the same for all of them.

use std::collections::BTreeMap;

use regex::RegexBuilder;

use crate::error::{AppError, Result};
use crate::models::{
    Level, PatternKind, ReportKind, RowWindow, SelectorProfile, SiteEra, parse_selector,
};

/// What a missing station link on an intermediate page means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDown {
    /// Every territory must link down to its stations
    Required,
    /// Some territories publish no station-level table
    Optional,
}

/// One kind of region-level report and the pages below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub pattern: PatternKind,

    /// Report embedded in the region page the pattern links to
    pub territory_kind: ReportKind,

    /// Report on the per-territory station pages
    pub station_kind: ReportKind,

    /// Links from the region report page to intermediate territory pages
    pub territory_links: String,

    pub drill_down: DrillDown,
}

/// Fixed anchor positions holding commission names at one hierarchy level.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityPaths {
    pub region: String,
    pub area_committee: Option<String>,
    pub territory: Option<String>,
}

/// All positional knowledge about one generation of the site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteLayout {
    pub era: SiteEra,

    /// Region choices on the root page
    pub region_options: String,

    /// Attribute of a region choice holding its URL
    pub option_attr: String,

    /// Link-text patterns on a region home page; all must match
    pub patterns: Vec<(PatternKind, String)>,

    pub branches: Vec<Branch>,

    /// Single link from an intermediate territory page to its station table
    pub station_link: String,

    pub profiles: BTreeMap<ReportKind, SelectorProfile>,

    pub region_identity: IdentityPaths,
    pub station_identity: IdentityPaths,

    /// Important rows of the results-shaped tables
    pub results_rows: RowWindow,

    /// Important rows of the turnout tables
    pub turnout_rows: RowWindow,
}

impl SiteLayout {
    /// Built-in layout for an era.
    pub fn for_era(era: SiteEra) -> Self {
        match era {
            SiteEra::Presidential2018 => defaults::presidential_2018(),
            SiteEra::Duma2016 => defaults::duma_2016(),
        }
    }

    /// Selector profile for a report kind.
    pub fn profile(&self, kind: ReportKind) -> Result<&SelectorProfile> {
        self.profiles.get(&kind).ok_or_else(|| {
            AppError::config(format!(
                "no selector profile for '{kind}' in the {} layout",
                self.era
            ))
        })
    }

    /// Branch reached through links matching `pattern`.
    pub fn branch(&self, pattern: PatternKind) -> Result<&Branch> {
        self.branches
            .iter()
            .find(|branch| branch.pattern == pattern)
            .ok_or_else(|| {
                AppError::config(format!(
                    "no branch for '{pattern}' links in the {} layout",
                    self.era
                ))
            })
    }

    pub fn identity_paths(&self, level: Level) -> &IdentityPaths {
        match level {
            Level::Region => &self.region_identity,
            Level::Station => &self.station_identity,
        }
    }

    /// Important-row window for a report kind.
    pub fn rows(&self, kind: ReportKind) -> &RowWindow {
        if kind.is_turnout() {
            &self.turnout_rows
        } else {
            &self.results_rows
        }
    }

    /// Check that every pattern leads somewhere and every selector parses.
    pub fn validate(&self) -> Result<()> {
        if self.patterns.is_empty() {
            return Err(AppError::config("layout has no link patterns"));
        }
        for (kind, pattern) in &self.patterns {
            RegexBuilder::new(pattern).case_insensitive(true).build()?;
            let branch = self.branch(*kind)?;
            self.profile(branch.territory_kind)?.validate()?;
            self.profile(branch.station_kind)?.validate()?;
            parse_selector(&branch.territory_links)?;
        }
        parse_selector(&self.region_options)?;
        parse_selector(&self.station_link)?;
        for identity in [&self.region_identity, &self.station_identity] {
            parse_selector(&identity.region)?;
            for path in [&identity.area_committee, &identity.territory]
                .into_iter()
                .flatten()
            {
                parse_selector(path)?;
            }
        }
        Ok(())
    }
}

mod defaults {
    use super::*;

    /// The page body is one outer table at region level and two at station
    /// level; everything else hangs off the fourth row of the last one.
    fn frame(level: Level) -> &'static str {
        match level {
            Level::Region => "body > table:nth-of-type(2) > tbody",
            Level::Station => "body > table:nth-of-type(3) > tbody",
        }
    }

    /// The summary table: a left table of row labels and totals next to a
    /// scrolling table with one column per subordinate commission.
    fn results_profile(level: Level) -> SelectorProfile {
        let grid = format!(
            "{} > tr:nth-of-type(4) > td > table:nth-of-type(6) > tbody > tr",
            frame(level)
        );
        SelectorProfile::headed(
            format!("{grid} > td:nth-of-type(1) > table > tbody > tr > td:nth-of-type(2)"),
            format!(
                "{grid} > td:nth-of-type(2) > div > table > tbody > tr:nth-of-type(1) > td"
            ),
            format!(
                "{grid} > td:nth-of-type(1) > table > tbody > tr:nth-of-type({{row}}) > td:nth-of-type({{col}}) > nobr > b"
            ),
            format!(
                "{grid} > td:nth-of-type(2) > div > table > tbody > tr:nth-of-type({{row}}) > td:nth-of-type({{col}}) > nobr > b"
            ),
        )
    }

    fn results_territory_links() -> String {
        format!(
            "{} > tr:nth-of-type(4) > td > table:nth-of-type(6) > tbody > tr > td:nth-of-type(2) > div > table > tbody > tr:nth-of-type(1) > td > nobr > a",
            frame(Level::Region)
        )
    }

    /// Turnout is a single table with one row per commission and the
    /// reporting times in columns 3 to 6.
    fn turnout_profile(level: Level) -> SelectorProfile {
        let table = format!(
            "{} > tr:nth-of-type(4) > td > table:nth-of-type(4) > tbody",
            frame(level)
        );
        SelectorProfile::fixed(
            format!("{table} > tr > td:nth-of-type(2)"),
            format!("{table} > tr:nth-of-type({{row}}) > td:nth-of-type({{col}})"),
            &[(3, "10:00"), (4, "12:00"), (5, "15:00"), (6, "18:00")],
        )
    }

    fn turnout_territory_links() -> String {
        format!(
            "{} > tr:nth-of-type(4) > td > table:nth-of-type(4) > tbody > tr > td:nth-of-type(2) > a",
            frame(Level::Region)
        )
    }

    fn station_link() -> String {
        format!("{} > tr:nth-of-type(2) > td > a", frame(Level::Region))
    }

    fn crumb(level: Level, n: usize) -> String {
        format!(
            "{} > tr:nth-of-type(1) > td > a:nth-of-type({n})",
            frame(level)
        )
    }

    fn region_identity() -> IdentityPaths {
        IdentityPaths {
            region: crumb(Level::Region, 2),
            area_committee: Some(crumb(Level::Region, 3)),
            territory: None,
        }
    }

    fn station_identity() -> IdentityPaths {
        IdentityPaths {
            region: crumb(Level::Station, 1),
            area_committee: Some(crumb(Level::Station, 2)),
            territory: Some(crumb(Level::Station, 3)),
        }
    }

    const RESULTS_PATTERN: &str = "Сводная таблица (предварительных )?итогов голосования";
    const TURNOUT_PATTERN: &str = "Предварительные сведения об участии избирателей в выборах";

    fn turnout_branch() -> Branch {
        Branch {
            pattern: PatternKind::Turnout,
            territory_kind: ReportKind::TurnoutTerritory,
            station_kind: ReportKind::TurnoutStation,
            territory_links: turnout_territory_links(),
            drill_down: DrillDown::Optional,
        }
    }

    fn results_branch(
        pattern: PatternKind,
        territory_kind: ReportKind,
        station_kind: ReportKind,
    ) -> Branch {
        Branch {
            pattern,
            territory_kind,
            station_kind,
            territory_links: results_territory_links(),
            drill_down: DrillDown::Required,
        }
    }

    fn base(era: SiteEra, results_rows: RowWindow) -> SiteLayout {
        let mut profiles = BTreeMap::new();
        profiles.insert(ReportKind::TurnoutTerritory, turnout_profile(Level::Region));
        profiles.insert(ReportKind::TurnoutStation, turnout_profile(Level::Station));

        SiteLayout {
            era,
            region_options: "option".to_string(),
            option_attr: "value".to_string(),
            patterns: Vec::new(),
            branches: vec![turnout_branch()],
            station_link: station_link(),
            profiles,
            region_identity: region_identity(),
            station_identity: station_identity(),
            results_rows,
            turnout_rows: RowWindow::tail(2),
        }
    }

    /// 12 ballot statistics, a blank row, then one row per candidate.
    pub fn presidential_2018() -> SiteLayout {
        let mut layout = base(
            SiteEra::Presidential2018,
            RowWindow {
                first_stat: 1,
                last_stat: 13,
                first_candidate: 14,
            },
        );
        layout.patterns = vec![
            (PatternKind::Results, RESULTS_PATTERN.to_string()),
            (PatternKind::Turnout, TURNOUT_PATTERN.to_string()),
        ];
        layout.branches.push(results_branch(
            PatternKind::Results,
            ReportKind::ResultsTerritory,
            ReportKind::ResultsStation,
        ));
        layout
            .profiles
            .insert(ReportKind::ResultsTerritory, results_profile(Level::Region));
        layout
            .profiles
            .insert(ReportKind::ResultsStation, results_profile(Level::Station));
        layout
    }

    /// 18 ballot statistics, a blank row, then one row per party or
    /// candidate.
    pub fn duma_2016() -> SiteLayout {
        let mut layout = base(
            SiteEra::Duma2016,
            RowWindow {
                first_stat: 1,
                last_stat: 19,
                first_candidate: 20,
            },
        );
        layout.patterns = vec![
            (
                PatternKind::Federal,
                format!("{RESULTS_PATTERN} по федеральному избирательному округу"),
            ),
            (
                PatternKind::SingleMandate,
                format!("{RESULTS_PATTERN} по одномандатному избирательному округу"),
            ),
            (PatternKind::Turnout, TURNOUT_PATTERN.to_string()),
        ];
        layout.branches.push(results_branch(
            PatternKind::Federal,
            ReportKind::Federal,
            ReportKind::FederalStation,
        ));
        layout.branches.push(results_branch(
            PatternKind::SingleMandate,
            ReportKind::SingleMandate,
            ReportKind::SingleMandateStation,
        ));
        for (kind, level) in [
            (ReportKind::Federal, Level::Region),
            (ReportKind::FederalStation, Level::Station),
            (ReportKind::SingleMandate, Level::Region),
            (ReportKind::SingleMandateStation, Level::Station),
        ] {
            layout.profiles.insert(kind, results_profile(level));
        }
        layout
    }
}
