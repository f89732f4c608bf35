//! Interactive filter state over one canonical dataset.
//!
//! A [`DashboardSession`] owns the current [`FilterSelection`] and the
//! options each control offers. Every interaction replaces the selection and
//! the report is recomputed from scratch; the dataset itself is shared and
//! never mutated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sales_core::error::{DashboardError, Result};
use sales_core::models::{constraint_from_label, label_for_constraint, FilterSelection};
use sales_data::aggregator::{FilterOptions, SalesAggregator, SalesReport};
use sales_data::export;
use sales_data::reader::SalesDataset;

// ── FilterField ───────────────────────────────────────────────────────────────

/// One of the three filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Month,
    City,
    Product,
}

impl FilterField {
    pub const ALL: [FilterField; 3] = [FilterField::Month, FilterField::City, FilterField::Product];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Month => "Month",
            FilterField::City => "City",
            FilterField::Product => "Product",
        }
    }

    /// The control after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            FilterField::Month => FilterField::City,
            FilterField::City => FilterField::Product,
            FilterField::Product => FilterField::Month,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FilterField::Month => FilterField::Product,
            FilterField::City => FilterField::Month,
            FilterField::Product => FilterField::City,
        }
    }
}

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    dataset: Arc<SalesDataset>,
    options: FilterOptions,
    selection: FilterSelection,
}

impl DashboardSession {
    /// Start a session with every filter set to "All".
    pub fn new(dataset: Arc<SalesDataset>) -> Self {
        let options = FilterOptions::from_records(dataset.records());
        Self {
            dataset,
            options,
            selection: FilterSelection::all(),
        }
    }

    /// Start with `selection`; constraints naming values that do not occur in
    /// the dataset fall back to "All".
    pub fn with_selection(mut self, selection: FilterSelection) -> Self {
        self.set_selection(selection);
        self
    }

    /// Start with `selection`, refusing any constraint whose value does not
    /// occur in the dataset. Used for filters given on the command line.
    pub fn try_with_selection(mut self, selection: FilterSelection) -> Result<Self> {
        for field in FilterField::ALL {
            if let Some(value) = Self::constraint(&selection, field) {
                if !self.select(field, value) {
                    return Err(DashboardError::Config(format!(
                        "unknown {} '{}'",
                        field.label().to_lowercase(),
                        value
                    )));
                }
            }
        }
        Ok(self)
    }

    pub fn dataset(&self) -> &Arc<SalesDataset> {
        &self.dataset
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Replace the whole selection, dropping unknown values.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = FilterSelection::default();
        for field in FilterField::ALL {
            if let Some(value) = Self::constraint(&selection, field) {
                if !self.select(field, value) {
                    tracing::warn!(
                        "{} '{}' does not occur in the data; using All",
                        field.label(),
                        value
                    );
                }
            }
        }
    }

    /// Set one control to `label` ("All" or an observed value). Returns
    /// `false`, leaving the selection unchanged, when the label is not offered.
    pub fn select(&mut self, field: FilterField, label: &str) -> bool {
        if !self.choices(field).iter().any(|c| c == label) {
            return false;
        }
        *self.slot(field) = constraint_from_label(label);
        true
    }

    /// Step a control to its next (or previous) option, wrapping around.
    pub fn cycle(&mut self, field: FilterField, forward: bool) {
        let choices = self.choices(field);
        if choices.is_empty() {
            return;
        }
        let current = self.current_label(field);
        let idx = choices.iter().position(|c| c == current).unwrap_or(0);
        let len = choices.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        let label = choices[next].clone();
        *self.slot(field) = constraint_from_label(&label);
        tracing::debug!("{} filter -> {}", field.label(), label);
    }

    /// Set every control back to "All".
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::all();
    }

    /// The label currently shown by a control.
    pub fn current_label(&self, field: FilterField) -> &str {
        label_for_constraint(Self::constraint(&self.selection, field))
    }

    /// Options offered by a control, "All" first.
    pub fn choices(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Month => &self.options.months,
            FilterField::City => &self.options.cities,
            FilterField::Product => &self.options.products,
        }
    }

    /// Recompute every view for the current selection.
    pub fn report(&self) -> SalesReport<'_> {
        SalesAggregator::report(self.dataset.records(), &self.selection)
    }

    /// Write the currently filtered rows to `dir/filtered_sales.csv`.
    pub fn export_filtered(&self, dir: &Path) -> Result<PathBuf> {
        let rows = SalesAggregator::filter(self.dataset.records(), &self.selection);
        export::export_to_dir(&rows, dir)
    }

    /// Swap in a freshly loaded dataset, keeping the selection where its
    /// values still occur.
    pub fn replace_dataset(&mut self, dataset: Arc<SalesDataset>) {
        self.options = FilterOptions::from_records(dataset.records());
        self.dataset = dataset;
        let selection = std::mem::take(&mut self.selection);
        self.set_selection(selection);
    }

    fn constraint(selection: &FilterSelection, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Month => selection.month.as_deref(),
            FilterField::City => selection.city.as_deref(),
            FilterField::Product => selection.product.as_deref(),
        }
    }

    fn slot(&mut self, field: FilterField) -> &mut Option<String> {
        match field {
            FilterField::Month => &mut self.selection.month,
            FilterField::City => &mut self.selection.city,
            FilterField::Product => &mut self.selection.product,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
