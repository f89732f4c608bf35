use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. Absent or unparseable
/// values count as dark.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(parse_colorfgbg)
        .unwrap_or(BackgroundType::Dark)
}

fn parse_colorfgbg(value: &str) -> Option<BackgroundType> {
    let bg: u8 = value.split(';').next_back()?.parse().ok()?;
    Some(if bg <= 6 {
        BackgroundType::Dark
    } else {
        BackgroundType::Light
    })
}

/// Complete theme definition carrying all UI styles used by the dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── KPI cards ────────────────────────────────────────────────────────────
    pub kpi_border: Style,
    pub kpi_title: Style,
    pub kpi_value: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Revenue series (monthly bars, weekly line, product amount bars).
    pub chart_amount: Style,
    /// Units series in the product chart.
    pub chart_quantity: Style,
    pub chart_axis: Style,

    // ── Filters and tabs ─────────────────────────────────────────────────────
    pub filter_label: Style,
    pub filter_value: Style,
    /// Control that the cycle keys currently act on.
    pub filter_focus: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            kpi_border: Style::default().fg(Color::DarkGray),
            kpi_title: Style::default().fg(Color::Gray),
            kpi_value: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            chart_amount: Style::default().fg(Color::Green),
            chart_quantity: Style::default().fg(Color::Red),
            chart_axis: Style::default().fg(Color::Gray),

            filter_label: Style::default().fg(Color::Gray),
            filter_value: Style::default().fg(Color::White),
            filter_focus: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            kpi_border: Style::default().fg(Color::Gray),
            kpi_title: Style::default().fg(Color::DarkGray),
            kpi_value: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            chart_amount: Style::default().fg(Color::Green),
            chart_quantity: Style::default().fg(Color::Red),
            chart_axis: Style::default().fg(Color::DarkGray),

            filter_label: Style::default().fg(Color::DarkGray),
            filter_value: Style::default().fg(Color::Black),
            filter_focus: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Classic theme using only the basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            kpi_border: Style::default().fg(Color::DarkGray),
            kpi_title: Style::default().fg(Color::Gray),
            kpi_value: Style::default().fg(Color::Cyan),

            chart_amount: Style::default().fg(Color::Green),
            chart_quantity: Style::default().fg(Color::Red),
            chart_axis: Style::default().fg(Color::White),

            filter_label: Style::default().fg(Color::Gray),
            filter_value: Style::default().fg(Color::White),
            filter_focus: Style::default().fg(Color::Black).bg(Color::White),
            tab_active: Style::default().fg(Color::Yellow),
            tab_inactive: Style::default().fg(Color::Gray),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. `"auto"` and unknown names detect.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Style of a filter value, highlighted when its control has focus.
    pub fn filter_style(&self, focused: bool) -> Style {
        if focused {
            self.filter_focus
        } else {
            self.filter_value
        }
    }

    /// Alternating row style for striped tables.
    pub fn row_style(&self, index: usize) -> Style {
        if index % 2 == 0 {
            self.table_row
        } else {
            self.table_row_alt
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.chart_amount.fg, Some(Color::Green));
        assert_eq!(t.chart_quantity.fg, Some(Color::Red));
        assert_eq!(t.filter_focus.bg, Some(Color::Cyan));
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold() {
        let t = Theme::classic();
        for style in [t.header, t.value, t.kpi_value, t.table_total, t.tab_active] {
            assert!(!style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("LIGHT").header.fg, Some(Color::Blue));
        assert!(!Theme::from_name("classic")
            .header
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_from_name_auto_and_unknown_do_not_panic() {
        assert!(Theme::from_name("auto").header.fg.is_some());
        assert!(Theme::from_name("neon").header.fg.is_some());
    }

    // ── Background detection ─────────────────────────────────────────────────

    #[test]
    fn test_parse_colorfgbg() {
        assert_eq!(parse_colorfgbg("15;0"), Some(BackgroundType::Dark));
        assert_eq!(parse_colorfgbg("0;15"), Some(BackgroundType::Light));
        assert_eq!(parse_colorfgbg("0;default;7"), Some(BackgroundType::Light));
        assert_eq!(parse_colorfgbg("garbage"), None);
        assert_eq!(parse_colorfgbg(""), None);
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    #[test]
    fn test_filter_style() {
        let t = Theme::dark();
        assert_eq!(t.filter_style(true), t.filter_focus);
        assert_eq!(t.filter_style(false), t.filter_value);
    }

    #[test]
    fn test_row_style_alternates() {
        let t = Theme::dark();
        assert_eq!(t.row_style(0), t.table_row);
        assert_eq!(t.row_style(1), t.table_row_alt);
        assert_eq!(t.row_style(2), t.table_row);
    }
}
