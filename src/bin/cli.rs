//! izbirkom CLI
//!
//! Local execution entry point for the electoral commission crawler.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use izbirkom_crawler::{
    config::load_config,
    error::Result,
    models::{Config, SiteEra},
    pipeline,
    services::Handler,
    storage::JsonLinesSink,
};

/// izbirkom - Electoral Commission Crawler
#[derive(Parser, Debug)]
#[command(
    name = "izbirkom",
    version,
    about = "Crawls electoral commission pages for results and turnout tables"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Site layout to use instead of the configured one
    #[arg(long, global = true)]
    era: Option<SiteEra>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every region and write records as JSON lines
    Crawl {
        /// Central page listing the regions
        #[arg(long)]
        start_url: Option<String>,

        /// Output file (default: output.path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Follow only the first region and the first territory of each report
        #[arg(long)]
        test: bool,
    },

    /// Validate the configuration and the selected site layout
    Validate,

    /// Run one handler on a single page and print what it emits
    Extract {
        /// Handler name, e.g. region_results, intermediate_turnout, station_results
        handler: Handler,

        /// Page URL or path to a saved page
        source: String,
    },
}

/// Initialize logging; `RUST_LOG` takes precedence over both arguments.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config: Config = load_config(&cli.config)?;
    init_logging(cli.verbose, &config.logging.level);

    log::info!("izbirkom crawler starting...");
    if let Some(era) = cli.era {
        config.site.era = era;
    }

    match cli.command {
        Command::Crawl {
            start_url,
            output,
            test,
        } => {
            if let Some(start_url) = start_url {
                config.crawler.start_url = start_url;
            }
            if let Some(output) = output {
                config.output.path = output.display().to_string();
            }
            config.crawler.test_mode |= test;
            config.validate()?;

            let mut sink = JsonLinesSink::create(&config.output.path).await?;
            let outcome = pipeline::run_crawler(&config, &mut sink).await?;

            log::info!(
                "Wrote {} records to {}",
                outcome.records_written,
                sink.path().display()
            );
            if outcome.fetch_failures + outcome.branch_failures > 0 {
                log::warn!(
                    "{} branches were not crawled completely",
                    outcome.fetch_failures + outcome.branch_failures
                );
            }
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Extract { handler, source } => {
            let visit = pipeline::run_extract(&config, handler, &source).await?;
            for record in &visit.records {
                println!("{}", record.to_json_line()?);
            }
            for request in &visit.follow_ups {
                eprintln!("-> {} {}", request.handler, request.url);
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
