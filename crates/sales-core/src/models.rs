use chrono::{NaiveDateTime, NaiveTime};

use crate::calendar;
use crate::formatting::round_half_even;

/// Label of the unconstrained choice in every filter control.
pub const ALL_LABEL: &str = "All";

/// One transaction line item after cleaning and derivation.
///
/// Instances are only built through [`SalesRecord::new`], which computes the
/// derived fields once; they are never re-derived afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Opaque order identifier, kept verbatim.
    pub order_id: String,
    /// Product name.
    pub product: String,
    /// Units ordered on this line.
    pub quantity_ordered: u32,
    /// Unit price.
    pub price_each: f64,
    /// Order timestamp, `None` when the source value could not be parsed.
    pub order_date: Option<NaiveDateTime>,
    /// Free-text purchase address.
    pub purchase_address: String,
    /// Month name derived from `order_date`.
    pub month: Option<String>,
    /// Day name derived from `order_date`.
    pub day_of_week: Option<String>,
    /// Time-of-day component of `order_date`.
    pub order_time: Option<NaiveTime>,
    /// `quantity_ordered * price_each`, rounded to 2 decimals.
    pub amount: f64,
    /// City extracted from `purchase_address`.
    pub city: String,
}

impl SalesRecord {
    /// Build a record from its cleaned source fields, computing all derived
    /// fields.
    pub fn new(
        order_id: impl Into<String>,
        product: impl Into<String>,
        quantity_ordered: u32,
        price_each: f64,
        order_date: Option<NaiveDateTime>,
        purchase_address: impl Into<String>,
    ) -> Self {
        let purchase_address = purchase_address.into();
        let city = extract_city(&purchase_address);
        Self {
            order_id: order_id.into(),
            product: product.into(),
            quantity_ordered,
            price_each,
            month: order_date.map(|ts| calendar::month_name(&ts).to_string()),
            day_of_week: order_date.map(|ts| calendar::weekday_name(&ts).to_string()),
            order_time: order_date.map(|ts| ts.time()),
            order_date,
            amount: line_amount(quantity_ordered, price_each),
            purchase_address,
            city,
        }
    }
}

/// Line-item amount rounded to cents.
///
/// ```
/// use sales_core::models::line_amount;
///
/// assert_eq!(line_amount(3, 50.0), 150.0);
/// assert_eq!(line_amount(2, 11.95), 23.9);
/// ```
pub fn line_amount(quantity: u32, price: f64) -> f64 {
    round_half_even(f64::from(quantity) * price, 2)
}

/// City portion of a `"street, city, state zip"` address.
///
/// Takes the second-to-last comma-separated segment, trimmed. An address
/// without any comma is returned unchanged.
///
/// ```
/// use sales_core::models::extract_city;
///
/// assert_eq!(extract_city("917 1st St, Baltimore, MD 21001"), "Baltimore");
/// assert_eq!(extract_city("Nowhere"), "Nowhere");
/// ```
pub fn extract_city(address: &str) -> String {
    if !address.contains(',') {
        return address.to_string();
    }
    let segments: Vec<&str> = address.split(',').collect();
    segments[segments.len() - 2].trim().to_string()
}

// ── FilterSelection ───────────────────────────────────────────────────────────

/// Up to three independent equality constraints on the canonical dataset.
///
/// `None` means the field is unconstrained ("All").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub month: Option<String>,
    pub city: Option<String>,
    pub product: Option<String>,
}

impl FilterSelection {
    /// Selection with every field unconstrained.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selection from control labels, mapping `"All"` to unconstrained.
    pub fn from_labels(month: &str, city: &str, product: &str) -> Self {
        Self {
            month: constraint_from_label(month),
            city: constraint_from_label(city),
            product: constraint_from_label(product),
        }
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// `true` when no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.month.is_none() && self.city.is_none() && self.product.is_none()
    }

    /// `true` when `record` satisfies every constrained field by exact
    /// equality. A record with no month never matches a month constraint.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(month) = &self.month {
            if record.month.as_deref() != Some(month.as_str()) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if record.city != *city {
                return false;
            }
        }
        if let Some(product) = &self.product {
            if record.product != *product {
                return false;
            }
        }
        true
    }
}

/// Map a control label to a constraint: `"All"` is unconstrained.
pub fn constraint_from_label(label: &str) -> Option<String> {
    if label == ALL_LABEL {
        None
    } else {
        Some(label.to_string())
    }
}

/// Inverse of [`constraint_from_label`].
pub fn label_for_constraint(constraint: Option<&str>) -> &str {
    constraint.unwrap_or(ALL_LABEL)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
