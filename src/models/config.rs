//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ReportKind, RowWindow, SelectorProfile, SiteEra, SiteLayout};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Which site layout to use, and overrides to it
    #[serde(default)]
    pub site: SiteConfig,

    /// Where records are written
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        Url::parse(&self.crawler.start_url)
            .map_err(|e| AppError::config(format!("crawler.start_url: {e}")))?;
        if self.output.path.trim().is_empty() {
            return Err(AppError::config("output.path is empty"));
        }
        self.site.layout()?.validate()
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Central commission page listing the regions
    #[serde(default = "defaults::start_url")]
    pub start_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay after each completed request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Follow only the first region and the first territory of each report,
    /// for quick validation runs
    #[serde(default)]
    pub test_mode: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: defaults::start_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            test_mode: false,
        }
    }
}

/// Site layout selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub era: SiteEra,

    /// Replacement profiles keyed by report kind tag (e.g. `results_uik`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, SelectorProfile>,

    /// Replacement important-row window for results tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowWindow>,
}

impl SiteConfig {
    /// The era's built-in layout with this config's overrides applied.
    pub fn layout(&self) -> Result<SiteLayout> {
        let mut layout = SiteLayout::for_era(self.era);
        for (tag, profile) in &self.profiles {
            let kind: ReportKind = tag.parse()?;
            layout.profiles.insert(kind, profile.clone());
        }
        if let Some(rows) = self.rows {
            layout.results_rows = rows;
        }
        Ok(layout)
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON-lines file receiving one record per line
    #[serde(default = "defaults::output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: defaults::output_path(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub fn start_url() -> String {
        "http://www.vybory.izbirkom.ru/region/izbirkom?action=show&root_a=652000016\
         &vrn=100100084849062&region=0&global=true&type=0&prver=0&pronetvd=null"
            .into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; izbirkom-crawler/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        8
    }
    pub fn output_path() -> String {
        "output/records.jsonl".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
