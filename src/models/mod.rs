// src/models/mod.rs

//! Domain models for the crawler.
//!
//! This module contains the data structures shared by the extraction and
//! traversal services, organized by their primary purpose.

mod config;
mod layout;
mod page;
mod profile;
mod record;
mod report;

// Re-export all public types
pub use config::{Config, CrawlerConfig, LoggingConfig, OutputConfig, SiteConfig};
pub use layout::{Branch, DrillDown, IdentityPaths, SiteLayout};
pub use page::{Anchor, Page};
pub use profile::{FixedColumn, RowWindow, SelectorProfile, expand, parse_selector};
pub use record::{BAD_VALUE, ExtractedTable, PageIdentity, Record};
pub use report::{Level, PatternKind, ReportKind, SiteEra};
