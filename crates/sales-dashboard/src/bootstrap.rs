use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context};
use sales_core::settings::{Settings, APP_DIR_NAME};
use sales_data::reader::find_csv_files;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.sales-dashboard`, or `./.sales-dashboard` when there is no home.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Where the TUI `e` key and the default `--view export` write to.
pub fn exports_dir() -> PathBuf {
    app_dir().join("exports")
}

/// Log file used when the TUI owns the terminal and no `--log-file` is given.
pub fn default_log_path() -> PathBuf {
    app_dir().join("logs").join("sales-dashboard.log")
}

/// Ensure the standard `~/.sales-dashboard/` directory hierarchy exists.
///
/// Creates the following directories if absent (including any missing parents):
/// - `~/.sales-dashboard/`
/// - `~/.sales-dashboard/logs/`
/// - `~/.sales-dashboard/exports/`
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let dir = app_dir();
    std::fs::create_dir_all(dir.join("logs"))?;
    std::fs::create_dir_all(dir.join("exports"))?;
    Ok(dir)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto a tracing filter directive.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to `log_file` when given. Otherwise it goes to the default log
/// file while the TUI is `interactive`, and to stderr for headless views.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let target = match (log_file, interactive) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, true) => Some(default_log_path()),
        (None, false) => None,
    };

    let file_layer = match &target {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = target.is_none().then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Source resolution ──────────────────────────────────────────────────────────

/// The ordered list of CSV sources to ingest.
///
/// With `--discover` every `*.csv` under `--data-dir` is used (sorted by
/// path); otherwise the explicit `FILES` or the default monthly list.
pub fn resolve_sources(settings: &Settings) -> anyhow::Result<Vec<PathBuf>> {
    if settings.discover {
        let found = find_csv_files(&settings.data_dir);
        if found.is_empty() {
            bail!("no CSV files found under {}", settings.data_dir.display());
        }
        tracing::info!("Discovered {} CSV files under {}", found.len(), settings.data_dir.display());
        return Ok(found);
    }
    Ok(settings.source_paths())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
