//! Service layer for the crawler.
//!
//! This module contains the page-level logic:
//! - Link classification (`PageClassifier`)
//! - Table extraction (`TableExtractor`)
//! - Record assembly (`assemble`, `read_identity`)
//! - The traversal state machine (`Traversal`)

pub mod assembler;
mod classifier;
mod extractor;
mod traversal;

pub use assembler::{assemble, read_identity};
pub use classifier::{Classification, PageClassifier};
pub use extractor::{TOTAL_LABEL, TableExtractor, parse_value};
pub use traversal::{FetchRequest, Handler, Traversal, TraversalOptions, Visit};
