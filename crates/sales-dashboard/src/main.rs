mod bootstrap;
mod summary;

use anyhow::{Context, Result};
use sales_core::settings::Settings;
use sales_data::aggregator::SalesAggregator;
use sales_data::export::{self, EXPORT_FILE_NAME};
use sales_runtime::data_manager::DataManager;
use sales_runtime::session::DashboardSession;
use sales_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let interactive = settings.view == "dashboard";
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref(), interactive)?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Data dir: {}",
        settings.view,
        settings.theme,
        settings.data_dir.display()
    );

    let sources = bootstrap::resolve_sources(&settings)?;

    // Any unreadable source aborts before anything is shown.
    let mut data = DataManager::new();
    let dataset = data
        .get_or_load(&sources)
        .context("Cannot build the sales dataset; nothing will be shown")?;

    // A filter value that never occurs would otherwise widen to "All".
    let session = DashboardSession::new(dataset)
        .try_with_selection(settings.initial_filter())
        .context("Invalid --month/--city/--product filter")?;

    match settings.view.as_str() {
        "dashboard" => {
            let app = App::new(
                &settings.theme,
                session,
                data,
                sources,
                bootstrap::exports_dir(),
            );

            // The TUI exits on 'q' / Ctrl+C itself; the OS-level signal covers
            // the window before raw mode is entered.
            tokio::select! {
                result = app.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        "summary" => {
            print!("{}", summary::render_summary(&session));
        }

        "export" => {
            let path = settings
                .output
                .clone()
                .unwrap_or_else(|| bootstrap::exports_dir().join(EXPORT_FILE_NAME));
            let rows = SalesAggregator::filter(session.dataset().records(), session.selection());
            let written = export::export_to_path(&rows, &path)?;
            println!("Exported {} rows to {}", rows.len(), written.display());
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
