//! Filter pane: the three controls plus the key legend.

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use sales_runtime::session::{DashboardSession, FilterField};

use crate::themes::Theme;

/// Widest value a control shows before it is cut with `…`.
pub const MAX_VALUE_WIDTH: usize = 28;

/// Key legend shown under the controls.
pub const KEY_HELP: &str =
    "m/c/p next  M/C/P prev  ←/→ focus  +/- step  r reset  e export  R reload  Tab view  ↑/↓ [/] scroll  q quit";

pub struct FilterBar<'a> {
    /// `(control, label currently selected)` in display order.
    pub controls: Vec<(FilterField, String)>,
    pub focus: FilterField,
    pub theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn from_session(session: &DashboardSession, focus: FilterField, theme: &'a Theme) -> Self {
        let controls = FilterField::ALL
            .iter()
            .map(|&field| (field, session.current_label(field).to_string()))
            .collect();
        Self {
            controls,
            focus,
            theme,
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut spans = Vec::with_capacity(self.controls.len() * 4);
        for (i, (field, value)) in self.controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("   ", self.theme.dim));
            }
            spans.push(Span::styled(format!("{}: ", field.label()), self.theme.filter_label));
            spans.push(Span::styled(
                format!(" {} ", truncate_to_width(value, MAX_VALUE_WIDTH)),
                self.theme.filter_style(*field == self.focus),
            ));
        }
        vec![
            Line::from(spans),
            Line::from(Span::styled(KEY_HELP, self.theme.dim)),
        ]
    }
}

/// Cut `text` to at most `max` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
