//! Delimited-text export of a filtered record set.

use std::io::Write;
use std::path::{Path, PathBuf};

use sales_core::error::{DashboardError, Result};
use sales_core::formatting::format_plain_float;
use sales_core::models::SalesRecord;
use tracing::info;

/// File name offered for the filtered download.
pub const EXPORT_FILE_NAME: &str = "filtered_sales.csv";

/// Content type of the exported document.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Column order of the exported document.
pub const EXPORT_HEADER: [&str; 11] = [
    "Order ID",
    "Product",
    "Quantity Ordered",
    "Price Each",
    "Order Date",
    "Purchase Address",
    "Month",
    "Day",
    "Order Time",
    "Amount",
    "City",
];

/// Write `rows` as CSV (header first) into `writer`.
pub fn write_csv<W: Write>(rows: &[&SalesRecord], writer: W) -> std::result::Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(EXPORT_HEADER)?;
    for row in rows {
        out.write_record(export_fields(row))?;
    }
    out.flush()?;
    Ok(())
}

/// Render `rows` as UTF-8 CSV bytes, ready to hand to a download.
pub fn to_csv_bytes(rows: &[&SalesRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf).map_err(|source| DashboardError::Export {
        path: PathBuf::from(EXPORT_FILE_NAME),
        source,
    })?;
    Ok(buf)
}

/// Write `rows` to `path`, creating parent directories as needed.
pub fn export_to_path(rows: &[&SalesRecord], path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path).map_err(|e| DashboardError::Export {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    write_csv(rows, file).map_err(|source| DashboardError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(path.to_path_buf())
}

/// Write `rows` to `dir/filtered_sales.csv`.
pub fn export_to_dir(rows: &[&SalesRecord], dir: &Path) -> Result<PathBuf> {
    export_to_path(rows, &dir.join(EXPORT_FILE_NAME))
}

fn export_fields(row: &SalesRecord) -> [String; 11] {
    [
        row.order_id.clone(),
        row.product.clone(),
        row.quantity_ordered.to_string(),
        format_plain_float(row.price_each),
        row.order_date
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        row.purchase_address.clone(),
        row.month.clone().unwrap_or_default(),
        row.day_of_week.clone().unwrap_or_default(),
        row.order_time
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default(),
        format_plain_float(row.amount),
        row.city.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn widget() -> SalesRecord {
        SalesRecord::new(
            "176558",
            "Widget",
            3,
            50.0,
            NaiveDate::from_ymd_opt(2019, 4, 19)
                .unwrap()
                .and_hms_opt(8, 46, 0),
            "1 Main St, Springfield, IL 00000",
        )
    }

    #[test]
    fn test_to_csv_bytes_layout() {
        let r = widget();
        let bytes = to_csv_bytes(&[&r]).expect("export");
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Order ID,Product,Quantity Ordered,Price Each,Order Date,Purchase Address,Month,Day,Order Time,Amount,City"
        );
        assert_eq!(
            lines.next().unwrap(),
            "176558,Widget,3,50.0,2019-04-19 08:46:00,\"1 Main St, Springfield, IL 00000\",April,Friday,08:46:00,150.0,Springfield"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_null_timestamp_cells_are_empty() {
        let r = SalesRecord::new("9", "Cable", 2, 11.95, None, "Nowhere");
        let text = String::from_utf8(to_csv_bytes(&[&r]).unwrap()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(row, "9,Cable,2,11.95,,Nowhere,,,,23.9,Nowhere");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_export_to_dir_uses_fixed_name() {
        let dir = TempDir::new().expect("tempdir");
        let r = widget();
        let path = export_to_dir(&[&r], &dir.path().join("exports")).expect("export");
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Springfield"));
        assert_eq!(EXPORT_CONTENT_TYPE, "text/csv");
    }
}
