//! Chart widgets for the trend and product views.
//!
//! Each `render_*` function draws one bordered chart into the given area.
//! The data shaping is kept in small pure helpers so it can be tested without
//! a terminal.

use ratatui::{
    layout::{Alignment, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use sales_core::formatting::{format_count, format_currency_compact};
use sales_data::aggregator::{ProductPerformance, SeriesPoint};

use crate::themes::Theme;

pub const MONTHLY_TITLE: &str = "Monthly Sales Trend";
pub const WEEKLY_TITLE: &str = "Weekly Sales Trend";
pub const PRODUCT_TITLE: &str = "Product Sales Performance";

// ── Data shaping ──────────────────────────────────────────────────────────────

/// First three characters of a month or weekday name.
pub fn abbreviate(label: &str) -> String {
    label.chars().take(3).collect()
}

/// Bar height for a revenue figure, in whole currency units.
pub fn bar_value(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    }
}

/// `(x, y)` points for the weekly line, x being the weekday position.
pub fn line_points(points: &[SeriesPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect()
}

/// Y-axis bounds with some headroom above the largest value.
pub fn y_bounds(points: &[SeriesPoint]) -> [f64; 2] {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        [0.0, 1.0]
    } else {
        [0.0, max * 1.1]
    }
}

fn titled_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(format!(" {title} "), theme.header))
}

// ── Monthly ───────────────────────────────────────────────────────────────────

/// Bar chart of revenue per calendar month.
pub fn render_monthly_trend(frame: &mut Frame, area: Rect, points: &[SeriesPoint], theme: &Theme) {
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value(bar_value(p.value))
                .text_value(format_currency_compact(p.value))
                .label(Line::from(abbreviate(&p.label)))
                .style(theme.chart_amount)
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let count = points.len().max(1) as u16;
    let bar_width = (inner_width / count).saturating_sub(1).clamp(3, 9);

    let chart = BarChart::default()
        .block(titled_block(MONTHLY_TITLE, theme))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(theme.chart_axis)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

// ── Weekly ────────────────────────────────────────────────────────────────────

/// Line chart of revenue per weekday, Monday first.
pub fn render_weekly_trend(frame: &mut Frame, area: Rect, points: &[SeriesPoint], theme: &Theme) {
    let data = line_points(points);
    let bounds = y_bounds(points);
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .name("Amount")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_amount)
        .data(&data);

    let x_labels: Vec<Span> = points
        .iter()
        .map(|p| Span::styled(abbreviate(&p.label), theme.chart_axis))
        .collect();
    let y_labels = vec![
        Span::styled(format_currency_compact(bounds[0]), theme.chart_axis),
        Span::styled(format_currency_compact(bounds[1] / 2.0), theme.chart_axis),
        Span::styled(format_currency_compact(bounds[1]), theme.chart_axis),
    ];

    let chart = Chart::new(vec![dataset])
        .block(titled_block(WEEKLY_TITLE, theme))
        .x_axis(
            Axis::default()
                .title(Span::styled("Day", theme.label))
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Total Amount", theme.label))
                .style(theme.chart_axis)
                .bounds(bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ── Products ──────────────────────────────────────────────────────────────────

/// Grouped bars of revenue and units per product, most units first.
///
/// `None` (no rows matched) draws a placeholder instead of an empty chart.
pub fn render_product_performance(
    frame: &mut Frame,
    area: Rect,
    products: Option<&[ProductPerformance]>,
    theme: &Theme,
) {
    let Some(products) = products.filter(|p| !p.is_empty()) else {
        let text = Paragraph::new(Line::from(Span::styled(
            "No sales match the current filters",
            theme.warning,
        )))
        .alignment(Alignment::Center)
        .block(titled_block(PRODUCT_TITLE, theme));
        frame.render_widget(text, area);
        return;
    };

    let legend = Line::from(vec![
        Span::styled("■ Amount  ", theme.chart_amount),
        Span::styled("■ Quantity", theme.chart_quantity),
    ]);

    let mut chart = BarChart::default()
        .block(titled_block(PRODUCT_TITLE, theme).title_bottom(legend))
        .bar_width(7)
        .bar_gap(0)
        .group_gap(2)
        .label_style(theme.chart_axis);

    for p in products {
        let bars = [
            Bar::default()
                .value(bar_value(p.amount))
                .text_value(format_currency_compact(p.amount))
                .style(theme.chart_amount),
            Bar::default()
                .value(p.quantity)
                .text_value(format_count(p.quantity))
                .style(theme.chart_quantity),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(crate::components::filters::truncate_to_width(
                    &p.product, 16,
                )))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn series(labels: &[&str], values: &[f64]) -> Vec<SeriesPoint> {
        labels
            .iter()
            .zip(values)
            .map(|(l, v)| SeriesPoint {
                label: l.to_string(),
                value: *v,
            })
            .collect()
    }

    fn weekly() -> Vec<SeriesPoint> {
        series(
            &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
            &[10.0, 20.0, 0.0, 40.5, 5.0, 0.0, 7.25],
        )
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── helpers ───────────────────────────────────────────────────────────

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("January"), "Jan");
        assert_eq!(abbreviate("Monday"), "Mon");
        assert_eq!(abbreviate("Q"), "Q");
    }

    #[test]
    fn test_bar_value() {
        assert_eq!(bar_value(1234.56), 1235);
        assert_eq!(bar_value(0.0), 0);
        assert_eq!(bar_value(-5.0), 0);
        assert_eq!(bar_value(f64::NAN), 0);
    }

    #[test]
    fn test_line_points() {
        let pts = line_points(&weekly());
        assert_eq!(pts.len(), 7);
        assert_eq!(pts[0], (0.0, 10.0));
        assert_eq!(pts[6], (6.0, 7.25));
    }

    #[test]
    fn test_y_bounds() {
        let b = y_bounds(&weekly());
        assert_eq!(b[0], 0.0);
        assert!((b[1] - 44.55).abs() < 1e-9);
        assert_eq!(y_bounds(&series(&["Monday"], &[0.0])), [0.0, 1.0]);
        assert_eq!(y_bounds(&[]), [0.0, 1.0]);
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn test_render_monthly_trend() {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        let theme = Theme::dark();
        let months = series(
            &[
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            &[1000.0, 0.0, 500.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2500.0],
        );
        terminal
            .draw(|f| render_monthly_trend(f, f.area(), &months, &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains(MONTHLY_TITLE));
        assert!(text.contains("Jan"));
        assert!(text.contains("Dec"));
    }

    #[test]
    fn test_render_weekly_trend_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let theme = Theme::dark();
        let week = weekly();
        terminal
            .draw(|f| render_weekly_trend(f, f.area(), &week, &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains(WEEKLY_TITLE));
    }

    #[test]
    fn test_render_weekly_trend_all_zero_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let theme = Theme::classic();
        let week = series(&["Monday", "Tuesday"], &[0.0, 0.0]);
        terminal
            .draw(|f| render_weekly_trend(f, f.area(), &week, &theme))
            .unwrap();
    }

    #[test]
    fn test_render_product_performance() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let theme = Theme::dark();
        let products = vec![
            ProductPerformance {
                product: "Widget".to_string(),
                amount: 150.0,
                quantity: 3,
            },
            ProductPerformance {
                product: "Gadget".to_string(),
                amount: 20.0,
                quantity: 1,
            },
        ];
        terminal
            .draw(|f| render_product_performance(f, f.area(), Some(&products), &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains(PRODUCT_TITLE));
        assert!(text.contains("Widget"));
        assert!(text.contains("Quantity"));
    }

    #[test]
    fn test_render_product_performance_none_shows_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|f| render_product_performance(f, f.area(), None, &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No sales match"));
    }
}
