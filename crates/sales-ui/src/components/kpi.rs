//! Row of four KPI cards.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use sales_core::formatting::format_count;
use sales_data::aggregator::Kpis;

use crate::themes::Theme;

/// Card titles, left to right.
pub const CARD_TITLES: [&str; 4] = [
    "Total Products",
    "Number of Cities",
    "Quantity Ordered",
    "Revenue",
];

pub struct KpiCards<'a> {
    pub kpis: &'a Kpis,
    pub theme: &'a Theme,
}

impl<'a> KpiCards<'a> {
    pub fn new(kpis: &'a Kpis, theme: &'a Theme) -> Self {
        Self { kpis, theme }
    }

    /// `(title, value)` for each card.
    pub fn cards(&self) -> [(&'static str, String); 4] {
        [
            (CARD_TITLES[0], format_count(self.kpis.total_products as u64)),
            (CARD_TITLES[1], format_count(self.kpis.number_of_cities as u64)),
            (CARD_TITLES[2], format_count(self.kpis.total_quantity)),
            (CARD_TITLES[3], self.kpis.revenue_display()),
        ]
    }

    /// Draw the cards side by side, each taking a quarter of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let slots = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for ((title, value), slot) in self.cards().into_iter().zip(slots.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.kpi_border)
                .title(Span::styled(format!(" {title} "), self.theme.kpi_title));
            let card = Paragraph::new(Line::from(Span::styled(value, self.theme.kpi_value)))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(card, *slot);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn kpis() -> Kpis {
        Kpis {
            total_products: 19,
            number_of_cities: 9,
            total_quantity: 209_079,
            total_revenue: 34_492_035.97,
        }
    }

    #[test]
    fn test_cards_values() {
        let k = kpis();
        let theme = Theme::dark();
        let cards = KpiCards::new(&k, &theme).cards();
        assert_eq!(cards[0], ("Total Products", "19".to_string()));
        assert_eq!(cards[1], ("Number of Cities", "9".to_string()));
        assert_eq!(cards[2], ("Quantity Ordered", "209,079".to_string()));
        assert_eq!(cards[3], ("Revenue", "$34,492,035.97".to_string()));
    }

    #[test]
    fn test_cards_for_empty_selection() {
        let k = Kpis::default();
        let theme = Theme::dark();
        let cards = KpiCards::new(&k, &theme).cards();
        assert_eq!(cards[2].1, "0");
        assert_eq!(cards[3].1, "$0.00");
    }

    #[test]
    fn test_render_shows_titles_and_values() {
        let backend = TestBackend::new(120, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let k = kpis();
        let theme = Theme::dark();

        terminal
            .draw(|frame| KpiCards::new(&k, &theme).render(frame, frame.area()))
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Total Products"));
        assert!(content.contains("$34,492,035.97"));
    }
}
