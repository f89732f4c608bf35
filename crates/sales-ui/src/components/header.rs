use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Accent placed either side of the application title.
pub const ACCENT: &str = "◆ ◇ ◆";

/// Application title, upper-cased as it appears in the header.
pub const TITLE: &str = "ELECTRONICS GADGET SALES ANALYSIS";

/// Dashboard header rendering three lines:
///
/// 1. Application title with accent decorations.
/// 2. A 60-column `=` separator.
/// 3. Source and record counts in `[ 12 sources | 185,950 records ]` format.
pub struct Header<'a> {
    pub source_count: usize,
    pub record_count: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source_count: usize, record_count: usize, theme: &'a Theme) -> Self {
        Self {
            source_count,
            record_count,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let sources = match self.source_count {
            1 => "1 source".to_string(),
            n => format!("{n} sources"),
        };
        let records = format!(
            "{} records",
            sales_core::formatting::format_count(self.record_count as u64)
        );

        vec![
            Line::from(vec![
                Span::styled(ACCENT, self.theme.header_accent),
                Span::styled(format!(" {TITLE} "), self.theme.header),
                Span::styled(ACCENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(60), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(sources, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(records, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
