use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{FilterSelection, ALL_LABEL};

/// Monthly exports read when no explicit source list is given, in the order
/// they are concatenated.
pub const DEFAULT_SOURCE_FILES: [&str; 12] = [
    "Sales_April_2019.csv",
    "Sales_August_2019.csv",
    "Sales_December_2019.csv",
    "Sales_February_2019.csv",
    "Sales_January_2019.csv",
    "Sales_July_2019.csv",
    "Sales_June_2019.csv",
    "Sales_March_2019.csv",
    "Sales_May_2019.csv",
    "Sales_November_2019.csv",
    "Sales_October_2019.csv",
    "Sales_September_2019.csv",
];

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".sales-dashboard";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive sales reporting over monthly CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-dashboard",
    about = "Interactive sales reporting over monthly CSV exports",
    version
)]
pub struct Settings {
    /// Sales CSV files to load (defaults to the twelve 2019 monthly exports)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Directory that relative source paths are resolved against
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Load every *.csv file found under --data-dir instead of the default list
    #[arg(long)]
    pub discover: bool,

    /// Initial month filter
    #[arg(long, default_value = ALL_LABEL)]
    pub month: String,

    /// Initial city filter
    #[arg(long, default_value = ALL_LABEL)]
    pub city: String,

    /// Initial product filter
    #[arg(long, default_value = ALL_LABEL)]
    pub product: String,

    /// Output mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "summary", "export"])]
    pub view: String,

    /// Destination file for --view export
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.sales-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl LastUsedParams {
    /// Default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories if
    /// needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with an explicit argument
    /// list and config path.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("could not clear {}: {}", config_path.display(), e);
            }
            return settings.apply_debug_flag();
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data_dir") {
            if let Some(v) = last.data_dir {
                settings.data_dir = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }

        settings = settings.apply_debug_flag();

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::debug!("could not persist settings: {}", e);
        }

        settings
    }

    /// The explicit source list: `files` (relative paths resolved against
    /// `data_dir`), or the default monthly exports inside `data_dir`.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            DEFAULT_SOURCE_FILES
                .iter()
                .map(|name| self.data_dir.join(name))
                .collect()
        } else {
            self.files
                .iter()
                .map(|f| {
                    if f.is_absolute() {
                        f.clone()
                    } else {
                        self.data_dir.join(f)
                    }
                })
                .collect()
        }
    }

    /// Initial filter selection from `--month`, `--city` and `--product`.
    pub fn initial_filter(&self) -> FilterSelection {
        FilterSelection::from_labels(&self.month, &self.city, &self.product)
    }

    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            data_dir: Some(s.data_dir.clone()),
            // A one-shot export is never replayed on the next run.
            view: (s.view != "export").then(|| s.view.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            data_dir: Some(PathBuf::from("/data/sales")),
            view: Some("summary".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.theme.as_deref(), Some("dark"));
        assert_eq!(loaded.data_dir, Some(PathBuf::from("/data/sales")));
        assert_eq!(loaded.view.as_deref(), Some("summary"));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.theme.is_none());
        assert!(loaded.data_dir.is_none());
        assert!(loaded.view.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).theme.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── Settings parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["sales-dashboard"]);
        assert!(settings.files.is_empty());
        assert_eq!(settings.data_dir, PathBuf::from("."));
        assert!(!settings.discover);
        assert_eq!(settings.month, "All");
        assert_eq!(settings.city, "All");
        assert_eq!(settings.product, "All");
        assert_eq!(settings.view, "dashboard");
        assert!(settings.output.is_none());
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_initial_filter() {
        let settings = Settings::parse_from([
            "sales-dashboard",
            "--month",
            "January",
            "--product",
            "USB-C Charging Cable",
        ]);
        let sel = settings.initial_filter();
        assert_eq!(sel.month.as_deref(), Some("January"));
        assert_eq!(sel.city, None);
        assert_eq!(sel.product.as_deref(), Some("USB-C Charging Cable"));
    }

    #[test]
    fn test_source_paths_default_list() {
        let settings = Settings::parse_from(["sales-dashboard", "--data-dir", "/srv/sales"]);
        let paths = settings.source_paths();
        assert_eq!(paths.len(), 12);
        assert_eq!(paths[0], PathBuf::from("/srv/sales/Sales_April_2019.csv"));
        assert_eq!(
            paths[11],
            PathBuf::from("/srv/sales/Sales_September_2019.csv")
        );
    }

    #[test]
    fn test_source_paths_explicit_files() {
        let settings = Settings::parse_from([
            "sales-dashboard",
            "--data-dir",
            "/srv/sales",
            "jan.csv",
            "/abs/feb.csv",
        ]);
        assert_eq!(
            settings.source_paths(),
            vec![
                PathBuf::from("/srv/sales/jan.csv"),
                PathBuf::from("/abs/feb.csv")
            ]
        );
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        let result = Settings::try_parse_from(["sales-dashboard", "--view", "pie"]);
        assert!(result.is_err());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_theme() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            data_dir: Some(PathBuf::from("/persisted")),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["sales-dashboard".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.data_dir, PathBuf::from("/persisted"));
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["sales-dashboard".into(), "--theme".into(), "light".into()],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["sales-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            vec!["sales-dashboard".into(), "--debug".into()],
            &tmp_config_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["sales-dashboard".into(), "--view".into(), "summary".into()],
            &config_path,
        );

        assert!(config_path.exists());
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.view.as_deref(), Some("summary"));
    }
}
