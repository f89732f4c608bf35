//! Filtering and grouped aggregation over the canonical dataset.
//!
//! Every view is a pure function of the filtered rows: KPI scalars, the
//! month and weekday trend series (reindexed onto their fixed orderings with
//! zero-fill), product performance, and the city × product revenue matrix.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sales_core::calendar::{month_position, weekday_position, MONTH_NAMES, WEEKDAY_NAMES};
use sales_core::formatting::format_currency;
use sales_core::models::{FilterSelection, SalesRecord, ALL_LABEL};

// ── Kpis ──────────────────────────────────────────────────────────────────────

/// Headline figures over the filtered rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    /// Distinct products present.
    pub total_products: usize,
    /// Distinct cities present.
    pub number_of_cities: usize,
    /// Sum of quantity ordered.
    pub total_quantity: u64,
    /// Sum of line amounts.
    pub total_revenue: f64,
}

impl Kpis {
    /// Revenue as `$1,234.56`.
    pub fn revenue_display(&self) -> String {
        format_currency(self.total_revenue)
    }
}

// ── Series / tables ───────────────────────────────────────────────────────────

/// One labelled value in a chart-ready series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Revenue and volume for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPerformance {
    pub product: String,
    pub amount: f64,
    pub quantity: u64,
}

/// Revenue per (city, product) pair; cities are rows, products are columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CityProductMatrix {
    /// Row labels, sorted.
    pub cities: Vec<String>,
    /// Column labels, sorted.
    pub products: Vec<String>,
    /// `cells[row][col]`, 0 for combinations with no sales.
    pub cells: Vec<Vec<f64>>,
}

impl CityProductMatrix {
    /// Revenue for a (city, product) pair, `None` when either label is
    /// not part of the matrix.
    pub fn get(&self, city: &str, product: &str) -> Option<f64> {
        let row = self.cities.iter().position(|c| c == city)?;
        let col = self.products.iter().position(|p| p == product)?;
        Some(self.cells[row][col])
    }

    /// Sum of a city's row.
    pub fn city_total(&self, row: usize) -> f64 {
        self.cells.get(row).map(|r| r.iter().sum()).unwrap_or(0.0)
    }

    /// Sum of a product's column.
    pub fn product_total(&self, col: usize) -> f64 {
        self.cells.iter().filter_map(|r| r.get(col)).sum()
    }
}

// ── FilterOptions ─────────────────────────────────────────────────────────────

/// Choices offered by the three filter controls, each starting with `"All"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Observed months in calendar order.
    pub months: Vec<String>,
    /// Observed cities, sorted.
    pub cities: Vec<String>,
    /// Observed products, sorted.
    pub products: Vec<String>,
}

impl FilterOptions {
    /// Collect the distinct observed values for each filterable field.
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let mut months: BTreeSet<usize> = BTreeSet::new();
        let mut cities: BTreeSet<&str> = BTreeSet::new();
        let mut products: BTreeSet<&str> = BTreeSet::new();

        for record in records {
            if let Some(pos) = record.month.as_deref().and_then(month_position) {
                months.insert(pos);
            }
            if let Some(city) = present(&record.city) {
                cities.insert(city);
            }
            if let Some(product) = present(&record.product) {
                products.insert(product);
            }
        }

        let with_all = |values: Vec<String>| {
            std::iter::once(ALL_LABEL.to_string())
                .chain(values)
                .collect::<Vec<_>>()
        };

        Self {
            months: with_all(months.into_iter().map(|i| MONTH_NAMES[i].to_string()).collect()),
            cities: with_all(cities.into_iter().map(str::to_string).collect()),
            products: with_all(products.into_iter().map(str::to_string).collect()),
        }
    }
}

// ── SalesReport ───────────────────────────────────────────────────────────────

/// Everything the presentation layer shows for one filter selection.
#[derive(Debug, Clone)]
pub struct SalesReport<'a> {
    /// The filtered rows, in canonical order.
    pub rows: Vec<&'a SalesRecord>,
    pub kpis: Kpis,
    /// Always 12 points, January first.
    pub monthly_trend: Vec<SeriesPoint>,
    /// Always 7 points, Monday first.
    pub weekly_trend: Vec<SeriesPoint>,
    /// `None` when no rows matched.
    pub product_performance: Option<Vec<ProductPerformance>>,
    /// `None` when no rows matched.
    pub city_product: Option<CityProductMatrix>,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that filters and aggregates sales records.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Compute the full report for `selection` over `records`.
    pub fn report<'a>(records: &'a [SalesRecord], selection: &FilterSelection) -> SalesReport<'a> {
        let rows = Self::filter(records, selection);
        let product_performance = Self::product_performance(&rows);
        SalesReport {
            kpis: Self::kpis(&rows),
            monthly_trend: Self::monthly_trend(&rows),
            weekly_trend: Self::weekly_trend(&rows),
            product_performance: (!product_performance.is_empty()).then_some(product_performance),
            city_product: Self::city_product_matrix(&rows),
            rows,
        }
    }

    /// Rows satisfying every constrained field of `selection`.
    pub fn filter<'a>(records: &'a [SalesRecord], selection: &FilterSelection) -> Vec<&'a SalesRecord> {
        records.iter().filter(|r| selection.matches(r)).collect()
    }

    pub fn kpis(rows: &[&SalesRecord]) -> Kpis {
        let mut products: BTreeSet<&str> = BTreeSet::new();
        let mut cities: BTreeSet<&str> = BTreeSet::new();
        let mut kpis = Kpis::default();

        for row in rows {
            if let Some(p) = present(&row.product) {
                products.insert(p);
            }
            if let Some(c) = present(&row.city) {
                cities.insert(c);
            }
            kpis.total_quantity += u64::from(row.quantity_ordered);
            kpis.total_revenue += row.amount;
        }

        kpis.total_products = products.len();
        kpis.number_of_cities = cities.len();
        kpis
    }

    /// Revenue per month over January→December; absent months are 0.
    pub fn monthly_trend(rows: &[&SalesRecord]) -> Vec<SeriesPoint> {
        let mut sums = [0.0_f64; 12];
        for row in rows {
            if let Some(i) = row.month.as_deref().and_then(month_position) {
                sums[i] += row.amount;
            }
        }
        Self::series(&MONTH_NAMES, &sums)
    }

    /// Revenue per weekday over Monday→Sunday; absent days are 0.
    pub fn weekly_trend(rows: &[&SalesRecord]) -> Vec<SeriesPoint> {
        let mut sums = [0.0_f64; 7];
        for row in rows {
            if let Some(i) = row.day_of_week.as_deref().and_then(weekday_position) {
                sums[i] += row.amount;
            }
        }
        Self::series(&WEEKDAY_NAMES, &sums)
    }

    /// Revenue and quantity per product, highest quantity first.
    ///
    /// Products with equal quantity keep name order.
    pub fn product_performance(rows: &[&SalesRecord]) -> Vec<ProductPerformance> {
        let mut map: BTreeMap<&str, ProductPerformance> = BTreeMap::new();
        for row in rows {
            let Some(product) = present(&row.product) else {
                continue;
            };
            let entry = map.entry(product).or_insert_with(|| ProductPerformance {
                product: product.to_string(),
                amount: 0.0,
                quantity: 0,
            });
            entry.amount += row.amount;
            entry.quantity += u64::from(row.quantity_ordered);
        }

        let mut result: Vec<ProductPerformance> = map.into_values().collect();
        // Stable sort over name-ordered input.
        result.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        result
    }

    /// Revenue pivot with cities as rows and products as columns, or `None`
    /// when there is nothing to pivot.
    pub fn city_product_matrix(rows: &[&SalesRecord]) -> Option<CityProductMatrix> {
        let mut sums: HashMap<(&str, &str), f64> = HashMap::new();
        let mut cities: BTreeSet<&str> = BTreeSet::new();
        let mut products: BTreeSet<&str> = BTreeSet::new();

        for row in rows {
            let (Some(city), Some(product)) = (present(&row.city), present(&row.product)) else {
                continue;
            };
            cities.insert(city);
            products.insert(product);
            *sums.entry((city, product)).or_insert(0.0) += row.amount;
        }

        if sums.is_empty() {
            return None;
        }

        let cells = cities
            .iter()
            .map(|city| {
                products
                    .iter()
                    .map(|product| sums.get(&(*city, *product)).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Some(CityProductMatrix {
            cities: cities.into_iter().map(str::to_string).collect(),
            products: products.into_iter().map(str::to_string).collect(),
            cells,
        })
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn series(labels: &[&str], values: &[f64]) -> Vec<SeriesPoint> {
        labels
            .iter()
            .zip(values)
            .map(|(label, value)| SeriesPoint {
                label: (*label).to_string(),
                value: *value,
            })
            .collect()
    }
}

/// Empty categorical values count as missing and are left out of distinct
/// counts and groupings.
fn present(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
