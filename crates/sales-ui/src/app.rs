//! Main application state and TUI event loop for the sales dashboard.
//!
//! [`App`] owns the theme, the filter session, the dataset cache and the
//! navigation state. Every key press that changes the selection triggers a
//! full recomputation of the report on the next draw.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame, Terminal,
};

use sales_core::error::{DashboardError, Result};
use sales_core::formatting::format_count;
use sales_data::aggregator::SalesAggregator;
use sales_runtime::data_manager::DataManager;
use sales_runtime::session::{DashboardSession, FilterField};

use crate::charts;
use crate::components::filters::FilterBar;
use crate::components::header::Header;
use crate::components::kpi::KpiCards;
use crate::table_view;
use crate::themes::Theme;

/// Rows moved by PageUp / PageDown in the raw-data view.
const PAGE_ROWS: usize = 20;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Which view the body of the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// KPI cards with the monthly and weekly trends.
    Overview,
    /// KPI cards with product performance.
    Products,
    /// City × product revenue table.
    Cities,
    /// Filtered records.
    RawData,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Products, Tab::Cities, Tab::RawData];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Products => "Products",
            Tab::Cities => "Cities",
            Tab::RawData => "Raw Data",
        }
    }

    fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// ── Status line ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One-line message shown at the bottom until the next action replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

fn terminal_error(e: io::Error) -> DashboardError {
    DashboardError::Terminal(e.to_string())
}

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub session: DashboardSession,
    /// Cache the current dataset came from; `R` reloads through it.
    pub data: DataManager,
    /// Source list the session was loaded from.
    pub sources: Vec<PathBuf>,
    /// Directory the `e` key writes `filtered_sales.csv` into.
    pub exports_dir: PathBuf,
    pub tab: Tab,
    /// Filter control acted on by `+` / `-`.
    pub focus: FilterField,
    /// First raw-data row shown.
    pub row_offset: usize,
    /// First product column shown in the city table.
    pub col_offset: usize,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        theme_name: &str,
        session: DashboardSession,
        data: DataManager,
        sources: Vec<PathBuf>,
        exports_dir: PathBuf,
    ) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            session,
            data,
            sources,
            exports_dir,
            tab: Tab::Overview,
            focus: FilterField::Month,
            row_offset: 0,
            col_offset: 0,
            status: None,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Terminal input is polled with a 250 ms timeout; the frame is redrawn
    /// only after an input event, so the report is recomputed once per
    /// interaction. Terminal failures surface as [`DashboardError::Terminal`].
    pub async fn run(self) -> Result<()> {
        self.run_terminal().await.map_err(terminal_error)
    }

    async fn run_terminal(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut dirty = true;

        let result: io::Result<()> = loop {
            if dirty {
                if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                    break Err(e);
                }
                dirty = false;
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                        dirty = true;
                    }
                    Ok(Event::Resize(..)) => dirty = true,
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }

            tokio::task::yield_now().await;
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,

            KeyCode::Char('m') => self.step_filter(FilterField::Month, true),
            KeyCode::Char('M') => self.step_filter(FilterField::Month, false),
            KeyCode::Char('c') => self.step_filter(FilterField::City, true),
            KeyCode::Char('C') => self.step_filter(FilterField::City, false),
            KeyCode::Char('p') => self.step_filter(FilterField::Product, true),
            KeyCode::Char('P') => self.step_filter(FilterField::Product, false),
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_filter(self.focus, true),
            KeyCode::Char('-') => self.step_filter(self.focus, false),
            KeyCode::Left => self.focus = self.focus.prev(),
            KeyCode::Right => self.focus = self.focus.next(),
            KeyCode::Char('r') => {
                self.session.reset_filters();
                self.reset_scroll();
                self.status = Some(StatusMessage::new(StatusKind::Info, "Filters reset to All"));
            }

            KeyCode::Char('e') => self.export(),
            KeyCode::Char('R') => self.reload(),

            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char(d @ '1'..='4') => {
                let idx = d as usize - '1' as usize;
                self.tab = Tab::ALL[idx];
            }

            KeyCode::Down => self.scroll_rows(1, true),
            KeyCode::Up => self.scroll_rows(1, false),
            KeyCode::PageDown => self.scroll_rows(PAGE_ROWS, true),
            KeyCode::PageUp => self.scroll_rows(PAGE_ROWS, false),
            KeyCode::Home => self.row_offset = 0,
            KeyCode::End => self.row_offset = self.filtered_len().saturating_sub(1),
            KeyCode::Char(']') => {
                let last = self.session.options().products.len().saturating_sub(2);
                self.col_offset = (self.col_offset + 1).min(last);
            }
            KeyCode::Char('[') => self.col_offset = self.col_offset.saturating_sub(1),
            _ => {}
        }
    }

    fn step_filter(&mut self, field: FilterField, forward: bool) {
        self.focus = field;
        self.session.cycle(field, forward);
        self.reset_scroll();
        self.status = None;
    }

    fn reset_scroll(&mut self) {
        self.row_offset = 0;
        self.col_offset = 0;
    }

    fn filtered_len(&self) -> usize {
        SalesAggregator::filter(self.session.dataset().records(), self.session.selection()).len()
    }

    fn scroll_rows(&mut self, by: usize, down: bool) {
        if down {
            let last = self.filtered_len().saturating_sub(1);
            self.row_offset = (self.row_offset + by).min(last);
        } else {
            self.row_offset = self.row_offset.saturating_sub(by);
        }
    }

    fn export(&mut self) {
        let rows = self.filtered_len();
        self.status = Some(match self.session.export_filtered(&self.exports_dir) {
            Ok(path) => StatusMessage::new(
                StatusKind::Success,
                format!("Exported {} rows to {}", format_count(rows as u64), path.display()),
            ),
            Err(e) => {
                tracing::error!("Export failed: {e}");
                StatusMessage::new(StatusKind::Error, format!("Export failed: {e}"))
            }
        });
    }

    fn reload(&mut self) {
        self.status = Some(match self.data.reload(&self.sources) {
            Ok(dataset) => {
                let count = dataset.len();
                self.session.replace_dataset(dataset);
                self.reset_scroll();
                StatusMessage::new(
                    StatusKind::Success,
                    format!("Reloaded {} records", format_count(count as u64)),
                )
            }
            Err(e) => {
                tracing::error!("Reload failed: {e}");
                StatusMessage::new(StatusKind::Error, format!("Reload failed: {e}"))
            }
        });
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, filter_area, tabs_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let dataset = self.session.dataset();
        let header = Header::new(dataset.sources().len(), dataset.len(), &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        if dataset.is_empty() {
            table_view::render_no_data(frame, body_area, &self.theme);
            self.render_status(frame, status_area);
            return;
        }

        let filters = FilterBar::from_session(&self.session, self.focus, &self.theme);
        frame.render_widget(Paragraph::new(filters.to_lines()), filter_area);

        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider("|");
        frame.render_widget(tabs, tabs_area);

        let report = self.session.report();
        match self.tab {
            Tab::Overview => {
                let [kpi_area, charts_area] =
                    Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).areas(body_area);
                KpiCards::new(&report.kpis, &self.theme).render(frame, kpi_area);
                let [monthly, weekly] =
                    Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                        .areas(charts_area);
                charts::render_monthly_trend(frame, monthly, &report.monthly_trend, &self.theme);
                charts::render_weekly_trend(frame, weekly, &report.weekly_trend, &self.theme);
            }
            Tab::Products => {
                let [kpi_area, chart_area] =
                    Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).areas(body_area);
                KpiCards::new(&report.kpis, &self.theme).render(frame, kpi_area);
                charts::render_product_performance(
                    frame,
                    chart_area,
                    report.product_performance.as_deref(),
                    &self.theme,
                );
            }
            Tab::Cities => table_view::render_city_product(
                frame,
                body_area,
                report.city_product.as_ref(),
                self.col_offset,
                &self.theme,
            ),
            Tab::RawData => {
                table_view::render_rows(frame, body_area, &report.rows, self.row_offset, &self.theme)
            }
        }

        self.render_status(frame, status_area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(msg) => {
                let style = match msg.kind {
                    StatusKind::Info => self.theme.info,
                    StatusKind::Success => self.theme.success,
                    StatusKind::Error => self.theme.error,
                };
                Line::from(Span::styled(msg.text.clone(), style))
            }
            None => Line::from(Span::styled(
                format!("Exports go to {}", self.exports_dir.display()),
                self.theme.dim,
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
