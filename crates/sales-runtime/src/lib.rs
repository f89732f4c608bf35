//! Runtime layer for the sales dashboard.
//!
//! Memoises canonical datasets per source list and holds the interactive
//! filter session that the terminal UI and the headless views drive.

pub mod data_manager;
pub mod session;

pub use sales_core as core;
pub use sales_data as data;
