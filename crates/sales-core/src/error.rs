use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A declared sales source could not be opened or read from disk.
    #[error("Failed to read sales source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row of a sales source could not be decoded.
    #[error("Failed to parse CSV header in {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The filtered record set could not be written out.
    #[error("Failed to export to {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_source_read_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::SourceRead {
            path: PathBuf::from("data/Sales_April_2019.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read sales source"));
        assert!(msg.contains("data/Sales_April_2019.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_export() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DashboardError::Export {
            path: PathBuf::from("/readonly/filtered_sales.csv"),
            source: csv::Error::from(io_err),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to export to /readonly/filtered_sales.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_config() {
        let err = DashboardError::Config("unknown month 'Smarch'".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown month 'Smarch'");
    }

    #[test]
    fn test_error_display_terminal() {
        let err = DashboardError::Terminal("crossterm failure".to_string());
        assert_eq!(err.to_string(), "Terminal error: crossterm failure");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DashboardError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
