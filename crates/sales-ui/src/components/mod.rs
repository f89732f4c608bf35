//! Small building blocks shared by the dashboard tabs.

pub mod filters;
pub mod header;
pub mod kpi;
