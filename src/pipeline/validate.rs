// src/pipeline/validate.rs

//! Configuration validation pipeline.

use crate::error::Result;
use crate::models::Config;

/// Counts reported by a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub patterns: usize,
    pub branches: usize,
    pub profiles: usize,
}

/// Validate the configuration and compile every pattern and selector of the
/// selected layout.
pub fn run_validate(config: &Config) -> Result<ValidationReport> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    let layout = config.site.layout()?;
    let report = ValidationReport {
        patterns: layout.patterns.len(),
        branches: layout.branches.len(),
        profiles: layout.profiles.len(),
    };

    log::info!("Config OK ({} layout)", layout.era);
    log::info!("  start URL: {}", config.crawler.start_url);
    log::info!("  user agent: {}", config.crawler.user_agent);
    log::info!(
        "  {} link patterns, {} branches, {} selector profiles",
        report.patterns,
        report.branches,
        report.profiles
    );
    log::info!(
        "  results rows {}..{} and {}.. ; turnout rows {}..",
        layout.results_rows.first_stat,
        layout.results_rows.last_stat,
        layout.results_rows.first_candidate,
        layout.turnout_rows.first_candidate
    );

    Ok(report)
}
