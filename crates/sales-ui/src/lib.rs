//! Terminal UI layer for the sales dashboard.
//!
//! Provides themes, the header, KPI and filter components, chart and table
//! views, and the main application event loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use sales_core as core;
