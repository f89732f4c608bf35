//! Core domain types for the sales dashboard.
//!
//! Holds the sales record model and filter selection, calendar orderings,
//! tolerant timestamp parsing, number formatting, the shared error type, and
//! CLI settings.

pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod timestamp;

pub use error::{DashboardError, Result};
