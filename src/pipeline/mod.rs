//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Crawl the whole hierarchy and write records
//! - `run_validate`: Check the configuration and the selected layout
//! - `run_extract`: Run one handler against a single page

pub mod crawl;
pub mod extract;
pub mod validate;

pub use crawl::{CrawlOutcome, run_crawler};
pub use extract::run_extract;
pub use validate::{ValidationReport, run_validate};
