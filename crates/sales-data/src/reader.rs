//! CSV ingest for monthly sales exports.
//!
//! Reads every declared source, concatenates the rows, drops the ones that
//! fail the quantity/price checks (this is also how stray header rows
//! repeated mid-file disappear), and builds [`SalesRecord`]s with their
//! derived fields.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use csv::StringRecord;
use regex::Regex;
use sales_core::error::{DashboardError, Result};
use sales_core::models::SalesRecord;
use sales_core::timestamp::TimestampParser;
use tracing::{debug, info, warn};

// ── Column names ──────────────────────────────────────────────────────────────

pub const COL_ORDER_ID: &str = "Order ID";
pub const COL_PRODUCT: &str = "Product";
pub const COL_QUANTITY: &str = "Quantity Ordered";
pub const COL_PRICE: &str = "Price Each";
pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_ADDRESS: &str = "Purchase Address";

// ── IngestStats ───────────────────────────────────────────────────────────────

/// Row counters collected while normalising one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Data rows read (header excluded).
    pub rows_read: u64,
    /// Rows dropped because every field was empty.
    pub empty_rows: u64,
    /// Rows dropped for a malformed quantity.
    pub invalid_quantity: u64,
    /// Rows dropped for a malformed price.
    pub invalid_price: u64,
    /// Rows kept with an unparseable timestamp.
    pub null_timestamps: u64,
    /// Rows skipped because the CSV decoder rejected them.
    pub undecodable_rows: u64,
    /// Records that made it into the canonical set.
    pub records: u64,
}

impl IngestStats {
    /// Add another set of counters to this one.
    pub fn merge(&mut self, other: &IngestStats) {
        self.rows_read += other.rows_read;
        self.empty_rows += other.empty_rows;
        self.invalid_quantity += other.invalid_quantity;
        self.invalid_price += other.invalid_price;
        self.null_timestamps += other.null_timestamps;
        self.undecodable_rows += other.undecodable_rows;
        self.records += other.records;
    }

    /// Total rows excluded from the canonical set.
    pub fn dropped(&self) -> u64 {
        self.empty_rows + self.invalid_quantity + self.invalid_price + self.undecodable_rows
    }
}

/// Counters for a single source file.
#[derive(Debug, Clone)]
pub struct SourceStats {
    pub path: PathBuf,
    pub stats: IngestStats,
}

// ── SalesDataset ──────────────────────────────────────────────────────────────

/// The canonical dataset: every cleaned record from an ordered source list.
///
/// Immutable once built; records appear in source-list order, then file order.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<SalesRecord>,
    sources: Vec<PathBuf>,
    per_source: Vec<SourceStats>,
    stats: IngestStats,
}

impl SalesDataset {
    /// Assemble a dataset from already-normalised records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let stats = IngestStats {
            rows_read: records.len() as u64,
            records: records.len() as u64,
            null_timestamps: records.iter().filter(|r| r.order_date.is_none()).count() as u64,
            ..Default::default()
        };
        Self {
            records,
            sources: Vec::new(),
            per_source: Vec::new(),
            stats,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The source list this dataset was built from.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Totals across all sources.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn source_stats(&self) -> &[SourceStats] {
        &self.per_source
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load, clean and derive the canonical dataset from `sources`.
///
/// Any source that cannot be opened aborts the whole load; no partial dataset
/// is returned. A source that yields zero valid rows is not an error.
pub fn load_sales(sources: &[PathBuf]) -> Result<SalesDataset> {
    let mut records = Vec::new();
    let mut per_source = Vec::with_capacity(sources.len());
    let mut totals = IngestStats::default();

    for path in sources {
        let (source_records, stats) = read_source(path)?;
        if stats.records == 0 {
            warn!("{} contributed no valid rows", path.display());
        }
        totals.merge(&stats);
        records.extend(source_records);
        per_source.push(SourceStats {
            path: path.clone(),
            stats,
        });
    }

    info!(
        "Loaded {} records from {} sources ({} rows dropped)",
        records.len(),
        sources.len(),
        totals.dropped()
    );

    Ok(SalesDataset {
        records,
        sources: sources.to_vec(),
        per_source,
        stats: totals,
    })
}

/// Read and normalise a single CSV source.
pub fn read_source(path: &Path) -> Result<(Vec<SalesRecord>, IngestStats)> {
    let file = File::open(path).map_err(|source| DashboardError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(file, path)
}

/// Normalise CSV content from any reader. `origin` is only used in errors
/// and logs.
pub fn parse_records<R: Read>(input: R, origin: &Path) -> Result<(Vec<SalesRecord>, IngestStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|source| DashboardError::CsvParse {
            path: origin.to_path_buf(),
            source,
        })?
        .clone();

    let mut stats = IngestStats::default();
    let mut records = Vec::new();

    if headers.is_empty() {
        warn!("{} has no header row", origin.display());
        return Ok((records, stats));
    }

    let columns = ColumnMap::from_headers(&headers);
    if columns.quantity.is_none() {
        debug!("{}: no '{}' column; quantity check skipped", origin.display(), COL_QUANTITY);
    }
    if columns.price.is_none() {
        debug!("{}: no '{}' column; price check skipped", origin.display(), COL_PRICE);
    }

    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(row) => {
                stats.rows_read += 1;
                if let Some(record) = normalize_row(&row, &columns, &mut stats) {
                    records.push(record);
                }
            }
            Err(e) => {
                stats.undecodable_rows += 1;
                warn!(
                    "Skipping undecodable row {} in {}: {}",
                    index + 2, // 1-based, after the header
                    origin.display(),
                    e
                );
            }
        }
    }
    stats.records = records.len() as u64;

    debug!(
        "Source {}: {} read, {} empty, {} bad quantity, {} bad price, {} null timestamps, {} kept",
        origin.display(),
        stats.rows_read,
        stats.empty_rows,
        stats.invalid_quantity,
        stats.invalid_price,
        stats.null_timestamps,
        stats.records,
    );

    Ok((records, stats))
}

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data directory does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Parse a quantity cell: a non-negative integer literal, grouping commas
/// allowed. Anything else (including the repeated header text) is `None`.
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let cleaned = raw.trim().replace(',', "");
    if !integer_literal().is_match(&cleaned) {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a price cell: a non-negative decimal literal once thousands
/// separators are removed. Literals too large for an `f64` are malformed.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if !decimal_literal().is_match(&cleaned) {
        return None;
    }
    cleaned.parse().ok().filter(|p: &f64| p.is_finite())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn integer_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+$").expect("regex is valid"))
}

fn decimal_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("regex is valid"))
}

/// Header positions of the known columns within one source.
#[derive(Debug, Clone, Default)]
struct ColumnMap {
    order_id: Option<usize>,
    product: Option<usize>,
    quantity: Option<usize>,
    price: Option<usize>,
    order_date: Option<usize>,
    address: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Self {
            order_id: find(COL_ORDER_ID),
            product: find(COL_PRODUCT),
            quantity: find(COL_QUANTITY),
            price: find(COL_PRICE),
            order_date: find(COL_ORDER_DATE),
            address: find(COL_ADDRESS),
        }
    }
}

fn field<'r>(row: &'r StringRecord, column: Option<usize>) -> &'r str {
    column.and_then(|i| row.get(i)).unwrap_or("")
}

/// Clean one row into a record, or `None` when the row must be dropped.
fn normalize_row(
    row: &StringRecord,
    columns: &ColumnMap,
    stats: &mut IngestStats,
) -> Option<SalesRecord> {
    if row.iter().all(|f| f.trim().is_empty()) {
        stats.empty_rows += 1;
        return None;
    }

    let quantity = match columns.quantity {
        Some(_) => match parse_quantity(field(row, columns.quantity)) {
            Some(q) => q,
            None => {
                stats.invalid_quantity += 1;
                return None;
            }
        },
        None => 0,
    };

    let price = match columns.price {
        Some(_) => match parse_price(field(row, columns.price)) {
            Some(p) => p,
            None => {
                stats.invalid_price += 1;
                return None;
            }
        },
        None => 0.0,
    };

    let order_date = TimestampParser::parse(field(row, columns.order_date));
    if order_date.is_none() {
        stats.null_timestamps += 1;
    }

    Some(SalesRecord::new(
        field(row, columns.order_id),
        field(row, columns.product),
        quantity,
        price,
        order_date,
        field(row, columns.address),
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
