//! Data layer for the sales dashboard.
//!
//! Ingests and normalises the monthly CSV exports into the canonical
//! dataset, filters and aggregates it into report views, and writes the
//! filtered set back out as CSV.

pub mod aggregator;
pub mod export;
pub mod reader;

pub use sales_core as core;
