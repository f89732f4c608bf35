//! Tabular views: the city × product matrix and the filtered raw rows.
//!
//! Both render a bordered [`ratatui::widgets::Table`] with a styled header
//! and striped rows. The matrix also gets a highlighted totals row.

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use sales_core::formatting::{format_count, format_currency, format_plain_float};
use sales_core::models::SalesRecord;
use sales_data::aggregator::CityProductMatrix;

use crate::components::filters::truncate_to_width;
use crate::themes::Theme;

pub const MATRIX_TITLE: &str = "Sales by City and Product";
pub const ROWS_TITLE: &str = "Raw Data (filtered)";

const CITY_WIDTH: u16 = 16;
const PRODUCT_WIDTH: u16 = 14;

/// Column headings of the raw-data table.
pub const ROW_HEADERS: [&str; 11] = [
    "Order ID",
    "Product",
    "Qty",
    "Price Each",
    "Order Date",
    "Purchase Address",
    "Month",
    "Day",
    "Time",
    "Amount",
    "City",
];

// ── Scrolling helpers ─────────────────────────────────────────────────────────

/// Rows of a `len`-row table visible from `offset` in a body `height` rows
/// tall. An offset past the end is pulled back to show the last page.
pub fn visible_window(len: usize, offset: usize, height: usize) -> Range<usize> {
    if len == 0 || height == 0 {
        return 0..0;
    }
    let start = offset.min(len.saturating_sub(height));
    start..(start + height).min(len)
}

/// How many product columns fit beside the city column in `width`.
pub fn matrix_columns_that_fit(width: u16) -> usize {
    // City column, then "Total" at the end.
    let usable = width.saturating_sub(2 + CITY_WIDTH + PRODUCT_WIDTH + 2);
    (usable / (PRODUCT_WIDTH + 1)).max(1) as usize
}

// ── City × product ────────────────────────────────────────────────────────────

/// Render the revenue matrix with cities as rows and products as columns.
///
/// `col_offset` is the first product column shown; narrower terminals page
/// through the products with it. `None` draws the "no data" placeholder.
pub fn render_city_product(
    frame: &mut Frame,
    area: Rect,
    matrix: Option<&CityProductMatrix>,
    col_offset: usize,
    theme: &Theme,
) {
    let Some(matrix) = matrix else {
        render_no_match(frame, area, MATRIX_TITLE, theme);
        return;
    };

    let fit = matrix_columns_that_fit(area.width);
    let cols = visible_window(matrix.products.len(), col_offset, fit);

    let mut header_cells = vec![Cell::from("City").style(theme.table_header)];
    header_cells.extend(matrix.products[cols.clone()].iter().map(|p| {
        Cell::from(truncate_to_width(p, PRODUCT_WIDTH as usize)).style(theme.table_header)
    }));
    header_cells.push(Cell::from("Total").style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = matrix
        .cities
        .iter()
        .enumerate()
        .map(|(i, city)| {
            let mut cells = vec![Cell::from(truncate_to_width(city, CITY_WIDTH as usize))];
            cells.extend(
                cols.clone()
                    .map(|c| Cell::from(format_currency(matrix.cells[i][c]))),
            );
            cells.push(Cell::from(format_currency(matrix.city_total(i))));
            Row::new(cells).style(theme.row_style(i))
        })
        .collect();

    let grand_total: f64 = (0..matrix.cities.len()).map(|i| matrix.city_total(i)).sum();
    let mut total_cells = vec![Cell::from("TOTAL")];
    total_cells.extend(
        cols.clone()
            .map(|c| Cell::from(format_currency(matrix.product_total(c)))),
    );
    total_cells.push(Cell::from(format_currency(grand_total)));
    rows.push(Row::new(total_cells).style(theme.table_total));

    let mut widths = vec![Constraint::Length(CITY_WIDTH)];
    widths.extend(cols.clone().map(|_| Constraint::Length(PRODUCT_WIDTH)));
    widths.push(Constraint::Length(PRODUCT_WIDTH + 2));

    let title = format!(
        " {MATRIX_TITLE} [products {}-{} of {}] ",
        cols.start + 1,
        cols.end,
        matrix.products.len()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title, theme.header)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Raw rows ──────────────────────────────────────────────────────────────────

fn record_cells(r: &SalesRecord) -> [String; 11] {
    [
        r.order_id.clone(),
        truncate_to_width(&r.product, 24),
        r.quantity_ordered.to_string(),
        format_plain_float(r.price_each),
        r.order_date
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        truncate_to_width(&r.purchase_address, 36),
        r.month.clone().unwrap_or_default(),
        r.day_of_week.clone().unwrap_or_default(),
        r.order_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default(),
        format_currency(r.amount),
        r.city.clone(),
    ]
}

/// Render the filtered records, starting at row `offset`.
pub fn render_rows(
    frame: &mut Frame,
    area: Rect,
    rows: &[&SalesRecord],
    offset: usize,
    theme: &Theme,
) {
    if rows.is_empty() {
        render_no_match(frame, area, ROWS_TITLE, theme);
        return;
    }

    // Borders and header take three rows.
    let body_height = area.height.saturating_sub(3) as usize;
    let window = visible_window(rows.len(), offset, body_height);

    let header = Row::new(
        ROW_HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let body: Vec<Row> = rows[window.clone()]
        .iter()
        .enumerate()
        .map(|(i, r)| Row::new(record_cells(r)).style(theme.row_style(window.start + i)))
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(24),
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(14),
    ];

    let title = format!(
        " {ROWS_TITLE}: rows {}-{} of {} ",
        format_count(window.start as u64 + 1),
        format_count(window.end as u64),
        format_count(rows.len() as u64),
    );
    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title, theme.header)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Placeholders ──────────────────────────────────────────────────────────────

fn render_no_match(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales match the current filters", theme.warning)),
        Line::from(Span::styled("Press 'r' to reset all filters to All", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} ")),
        ),
        area,
    );
}

/// Render a placeholder when the loaded dataset has no records at all.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales records found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check --data-dir, or pass the CSV files explicitly.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sales Dashboard "),
        ),
        area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use sales_core::timestamp::TimestampParser;

    fn matrix() -> CityProductMatrix {
        CityProductMatrix {
            cities: vec!["Austin".to_string(), "Boston".to_string()],
            products: vec!["Gadget".to_string(), "Widget".to_string()],
            cells: vec![vec![20.0, 0.0], vec![0.0, 1500.5]],
        }
    }

    fn records() -> Vec<SalesRecord> {
        (0..30)
            .map(|i| {
                SalesRecord::new(
                    format!("{}", 1000 + i),
                    "Widget",
                    1,
                    9.99,
                    TimestampParser::parse("04/19/19 08:46"),
                    "1 Main St, Springfield, IL 00000",
                )
            })
            .collect()
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

    // ── visible_window ────────────────────────────────────────────────────

    #[test]
    fn test_visible_window_basic() {
        assert_eq!(visible_window(100, 0, 10), 0..10);
        assert_eq!(visible_window(100, 15, 10), 15..25);
    }

    #[test]
    fn test_visible_window_clamps_to_last_page() {
        assert_eq!(visible_window(100, 95, 10), 90..100);
        assert_eq!(visible_window(5, 3, 10), 0..5);
    }

    #[test]
    fn test_visible_window_empty() {
        assert_eq!(visible_window(0, 3, 10), 0..0);
        assert_eq!(visible_window(10, 0, 0), 0..0);
    }

    #[test]
    fn test_matrix_columns_that_fit() {
        assert_eq!(matrix_columns_that_fit(10), 1);
        assert!(matrix_columns_that_fit(200) >= 10);
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn test_render_city_product_shows_totals() {
        let mut terminal = Terminal::new(TestBackend::new(120, 10)).unwrap();
        let theme = Theme::dark();
        let m = matrix();
        terminal
            .draw(|f| render_city_product(f, f.area(), Some(&m), 0, &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains(MATRIX_TITLE));
        assert!(text.contains("Boston"));
        assert!(text.contains("$1,500.50"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("$1,520.50"));
    }

    #[test]
    fn test_render_city_product_none_shows_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|f| render_city_product(f, f.area(), None, 0, &theme))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No sales match"));
    }

    #[test]
    fn test_render_rows_window_title() {
        let mut terminal = Terminal::new(TestBackend::new(200, 13)).unwrap();
        let theme = Theme::dark();
        let data = records();
        let rows: Vec<&SalesRecord> = data.iter().collect();
        terminal
            .draw(|f| render_rows(f, f.area(), &rows, 5, &theme))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("rows 6-15 of 30"), "got: {text}");
        assert!(text.contains("1005"));
        assert!(!text.contains("1004"));
    }

    #[test]
    fn test_render_rows_empty_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|f| render_rows(f, f.area(), &[], 0, &theme))
            .unwrap();
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let theme = Theme::dark();
        terminal.draw(|f| render_no_data(f, f.area(), &theme)).unwrap();
        assert!(buffer_text(&terminal).contains("No sales records found"));
    }
}
