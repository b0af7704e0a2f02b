//! Crawl traversal state machine.
//!
//! The crawl walks strictly downward:
//!
//! ```text
//! Root -> RegionHome -> RegionReport(p) -> Intermediate(p) -> Station(p)
//! ```
//!
//! where `p` is the link pattern that led into the branch. Each state is a
//! handler that turns one fetched page into follow-up requests and at most
//! one record. Handlers share nothing but the immutable layout, so pages can
//! be visited in any order and more than once.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{
    CrawlerConfig, DrillDown, Page, PatternKind, Record, ReportKind, SiteLayout, parse_selector,
};
use crate::services::assembler::{assemble, read_identity};
use crate::services::{PageClassifier, TableExtractor};

/// The state a fetched page is handled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Central page listing every region
    Root,
    /// A region's home page, linking to its reports
    RegionHome,
    /// A region-level report: summary table plus territory links
    RegionReport(PatternKind),
    /// A territory page with a single link to its station table
    Intermediate(PatternKind),
    /// A territory's station-level table
    Station(PatternKind),
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Root => f.write_str("root"),
            Handler::RegionHome => f.write_str("region_home"),
            Handler::RegionReport(p) => write!(f, "region_{p}"),
            Handler::Intermediate(p) => write!(f, "intermediate_{p}"),
            Handler::Station(p) => write!(f, "station_{p}"),
        }
    }
}

impl FromStr for Handler {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "root" => return Ok(Handler::Root),
            "region_home" => return Ok(Handler::RegionHome),
            _ => {}
        }
        let branched: [(&str, fn(PatternKind) -> Handler); 3] = [
            ("region_", Handler::RegionReport),
            ("intermediate_", Handler::Intermediate),
            ("station_", Handler::Station),
        ];
        branched
            .into_iter()
            .find_map(|(prefix, handler)| {
                let pattern: PatternKind = s.strip_prefix(prefix)?.parse().ok()?;
                Some(handler(pattern))
            })
            .ok_or_else(|| AppError::config(format!("unknown handler '{s}'")))
    }
}

/// A page to fetch and the handler to run on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub url: String,
    pub handler: Handler,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, handler: Handler) -> Self {
        Self {
            url: url.into(),
            handler,
        }
    }
}

/// Result of handling one page.
#[derive(Debug, Default)]
pub struct Visit {
    pub records: Vec<Record>,
    pub follow_ups: Vec<FetchRequest>,
}

/// Per-crawl switches passed to every handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Follow only the first region and the first territory of each report
    pub test_mode: bool,
}

impl From<&CrawlerConfig> for TraversalOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            test_mode: config.test_mode,
        }
    }
}

/// Dispatches fetched pages to their state handlers.
pub struct Traversal {
    layout: Arc<SiteLayout>,
    classifier: PageClassifier,
    options: TraversalOptions,
}

impl Traversal {
    pub fn new(layout: Arc<SiteLayout>, options: TraversalOptions) -> Result<Self> {
        let classifier = PageClassifier::new(&layout.patterns)?;
        Ok(Self {
            layout,
            classifier,
            options,
        })
    }

    /// Handle `page` in state `handler`.
    ///
    /// Either the whole visit succeeds or nothing is emitted: a record is
    /// only returned once its table and identity were read completely.
    pub fn visit(&self, handler: Handler, page: &Page) -> Result<Visit> {
        log::debug!("{handler}: {}", page.url());
        match handler {
            Handler::Root => self.root(page),
            Handler::RegionHome => self.region_home(page),
            Handler::RegionReport(pattern) => self.region_report(pattern, page),
            Handler::Intermediate(pattern) => self.intermediate(pattern, page),
            Handler::Station(pattern) => self.station(pattern, page),
        }
    }

    fn breadth(&self) -> usize {
        if self.options.test_mode { 1 } else { usize::MAX }
    }

    fn root(&self, page: &Page) -> Result<Visit> {
        let options = parse_selector(&self.layout.region_options)?;
        let follow_ups: Vec<_> = page
            .select_attrs(&options, &self.layout.option_attr)
            .into_iter()
            .filter(|value| !value.is_empty())
            .take(self.breadth())
            .map(|value| FetchRequest::new(page.resolve(&value), Handler::RegionHome))
            .collect();
        log::info!("Found {} regions", follow_ups.len());

        Ok(Visit {
            records: Vec::new(),
            follow_ups,
        })
    }

    fn region_home(&self, page: &Page) -> Result<Visit> {
        let mut found = self.classifier.classify(page);
        found.retain(|c| {
            let linked = c.anchor.href.is_some();
            if !linked {
                log::debug!("'{}' link without target on {}", c.pattern, page.url());
            }
            linked
        });

        let missing = self.classifier.missing(&found);
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(PatternKind::as_str).collect();
            return Err(AppError::structure(
                page.url(),
                format!("no link matching pattern(s) {}", names.join(", ")),
            ));
        }

        let follow_ups = found
            .into_iter()
            .filter_map(|c| {
                c.anchor
                    .href
                    .map(|url| FetchRequest::new(url, Handler::RegionReport(c.pattern)))
            })
            .collect();

        Ok(Visit {
            records: Vec::new(),
            follow_ups,
        })
    }

    fn region_report(&self, pattern: PatternKind, page: &Page) -> Result<Visit> {
        let branch = self.layout.branch(pattern)?;
        let record = self.record(branch.territory_kind, page)?;

        let links = parse_selector(&branch.territory_links)?;
        let follow_ups: Vec<_> = page
            .anchors(&links)
            .into_iter()
            .filter_map(|anchor| anchor.href)
            .take(self.breadth())
            .map(|url| FetchRequest::new(url, Handler::Intermediate(pattern)))
            .collect();
        log::debug!("{} territory links on {}", follow_ups.len(), page.url());

        Ok(Visit {
            records: vec![record],
            follow_ups,
        })
    }

    fn intermediate(&self, pattern: PatternKind, page: &Page) -> Result<Visit> {
        let branch = self.layout.branch(pattern)?;
        let link = page
            .anchors(&parse_selector(&self.layout.station_link)?)
            .into_iter()
            .find_map(|anchor| anchor.href);

        match (link, branch.drill_down) {
            (Some(url), _) => Ok(Visit {
                records: Vec::new(),
                follow_ups: vec![FetchRequest::new(url, Handler::Station(pattern))],
            }),
            (None, DrillDown::Optional) => {
                log::debug!("No station-level {pattern} link on {}", page.url());
                Ok(Visit::default())
            }
            (None, DrillDown::Required) => Err(AppError::structure(
                page.url(),
                format!("no station-level {pattern} link"),
            )),
        }
    }

    fn station(&self, pattern: PatternKind, page: &Page) -> Result<Visit> {
        let branch = self.layout.branch(pattern)?;
        Ok(Visit {
            records: vec![self.record(branch.station_kind, page)?],
            follow_ups: Vec::new(),
        })
    }

    fn record(&self, kind: ReportKind, page: &Page) -> Result<Record> {
        let table = TableExtractor::for_kind(&self.layout, kind)?.extract(page)?;
        let identity = read_identity(page, self.layout.identity_paths(kind.level()))?;
        log::debug!(
            "{kind} table on {}: {} rows x {} columns",
            page.url(),
            table.row_headers.len(),
            table.column_headers.len()
        );
        Ok(assemble(identity, table, page, Utc::now()))
    }
}
