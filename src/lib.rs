// src/lib.rs

//! Electoral commission crawler library.
//!
//! Walks the commission hierarchy (central, region, territory, station),
//! classifies region pages by their link text and turns the position-addressed
//! results and turnout tables into JSON-line records.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod fixtures;
