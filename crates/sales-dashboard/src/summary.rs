//! Plain-text report for `--view summary`.

use std::fmt::Write;

use sales_core::formatting::{format_count, format_currency};
use sales_core::models::label_for_constraint;
use sales_data::aggregator::{CityProductMatrix, SalesReport, SeriesPoint};
use sales_data::reader::SalesDataset;
use sales_runtime::session::DashboardSession;

const RULE_WIDTH: usize = 60;

/// Render every view of the session's current selection as text.
pub fn render_summary(session: &DashboardSession) -> String {
    let report = session.report();
    let selection = session.selection();
    let mut out = String::new();

    let _ = writeln!(out, "ELECTRONICS GADGET SALES ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Month: {}  City: {}  Product: {}",
        label_for_constraint(selection.month.as_deref()),
        label_for_constraint(selection.city.as_deref()),
        label_for_constraint(selection.product.as_deref()),
    );
    let _ = writeln!(out);

    write_kpis(&mut out, &report);
    write_series(&mut out, "Monthly Sales Trend", &report.monthly_trend);
    write_series(&mut out, "Weekly Sales Trend", &report.weekly_trend);
    write_products(&mut out, &report);
    write_matrix(&mut out, report.city_product.as_ref());
    write_ingest(&mut out, session.dataset());

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

fn write_kpis(out: &mut String, report: &SalesReport<'_>) {
    section(out, "Key Figures");
    let k = &report.kpis;
    let _ = writeln!(out, "  {:<20}{:>20}", "Total Products", format_count(k.total_products as u64));
    let _ = writeln!(out, "  {:<20}{:>20}", "Number of Cities", format_count(k.number_of_cities as u64));
    let _ = writeln!(out, "  {:<20}{:>20}", "Quantity Ordered", format_count(k.total_quantity));
    let _ = writeln!(out, "  {:<20}{:>20}", "Revenue", k.revenue_display());
    let _ = writeln!(out);
}

fn write_series(out: &mut String, title: &str, points: &[SeriesPoint]) {
    section(out, title);
    for p in points {
        let _ = writeln!(out, "  {:<12}{:>20}", p.label, format_currency(p.value));
    }
    let _ = writeln!(out);
}

fn write_products(out: &mut String, report: &SalesReport<'_>) {
    section(out, "Product Sales Performance");
    match &report.product_performance {
        Some(products) => {
            let _ = writeln!(out, "  {:<30}{:>10}{:>18}", "Product", "Quantity", "Amount");
            for p in products {
                let _ = writeln!(
                    out,
                    "  {:<30}{:>10}{:>18}",
                    p.product,
                    format_count(p.quantity),
                    format_currency(p.amount)
                );
            }
        }
        None => {
            let _ = writeln!(out, "  No sales match the current filters");
        }
    }
    let _ = writeln!(out);
}

fn write_matrix(out: &mut String, matrix: Option<&CityProductMatrix>) {
    section(out, "Sales by City and Product");
    let Some(m) = matrix else {
        let _ = writeln!(out, "  No sales match the current filters");
        let _ = writeln!(out);
        return;
    };

    let city_width = m.cities.iter().map(|c| c.len()).max().unwrap_or(4).max(4) + 2;
    let col_widths: Vec<usize> = m
        .products
        .iter()
        .enumerate()
        .map(|(j, p)| {
            let widest_cell = m
                .cells
                .iter()
                .map(|row| format_currency(row[j]).len())
                .max()
                .unwrap_or(0);
            p.len().max(widest_cell) + 2
        })
        .collect();

    let _ = write!(out, "  {:<city_width$}", "City");
    for (p, w) in m.products.iter().zip(&col_widths) {
        let _ = write!(out, "{:>w$}", p, w = *w);
    }
    let _ = writeln!(out);
    for (i, city) in m.cities.iter().enumerate() {
        let _ = write!(out, "  {:<city_width$}", city);
        for (j, w) in col_widths.iter().enumerate() {
            let _ = write!(out, "{:>w$}", format_currency(m.cells[i][j]), w = *w);
        }
        let _ = writeln!(out);
    }
    let _ = writeln!(out);
}

fn write_ingest(out: &mut String, dataset: &SalesDataset) {
    section(out, "Ingest");
    for source in dataset.source_stats() {
        let s = &source.stats;
        let _ = writeln!(
            out,
            "  {}: {} read, {} kept, {} dropped, {} without timestamp",
            source.path.display(),
            format_count(s.rows_read),
            format_count(s.records),
            format_count(s.dropped()),
            format_count(s.null_timestamps),
        );
    }
    let t = dataset.stats();
    let _ = writeln!(
        out,
        "  Total: {} read, {} kept ({} empty, {} bad quantity, {} bad price, {} undecodable)",
        format_count(t.rows_read),
        format_count(t.records),
        format_count(t.empty_rows),
        format_count(t.invalid_quantity),
        format_count(t.invalid_price),
        format_count(t.undecodable_rows),
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
