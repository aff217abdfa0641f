use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;
use thiserror::Error;
use tracing::{debug, info};

use crate::db::Tenant;

#[derive(Error, Debug)]
pub enum CsvImportError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV: {0}")]
    Parse(#[from] csv::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TenantRecordError {
    #[error("Row {row}: missing column '{column}'")]
    MissingColumn { row: usize, column: &'static str },

    #[error("Row {row}: shop_id '{value}' is not an integer")]
    InvalidShopId { row: usize, value: String },
}

/// One data row, read against the file's header in column order.
///
/// A row shorter than the header has no value for its trailing columns;
/// values past the end of the header are ignored.
#[derive(Debug, Clone)]
pub struct CsvRow {
    headers: Arc<StringRecord>,
    record: StringRecord,
}

impl CsvRow {
    pub fn new(headers: Arc<StringRecord>, record: StringRecord) -> Self {
        Self { headers, record }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Field text for `column`, or `None` if the header lacks the column or
    /// this row stops before it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.position(column).and_then(|i| self.record.get(i))
    }

    /// `(header, value)` pairs in file column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header, self.record.get(i)))
    }

    // Last match wins when a header name repeats.
    fn position(&self, column: &str) -> Option<usize> {
        self.headers.iter().collect::<Vec<_>>().iter().rposition(|header| *header == column)
    }
}

/// Read a header-driven CSV file into rows, preserving file order.
///
/// Rows may be shorter or longer than the header; columns that no caller
/// asks for are kept and otherwise ignored.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<CsvRow>, CsvImportError> {
    let path = path.as_ref();
    info!("Reading data from CSV file: {}", path.display());

    let file = File::open(path).map_err(|source| CsvImportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = Arc::new(reader.headers()?.clone());

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(CsvRow::new(Arc::clone(&headers), record?));
    }

    debug!("Parsed {} data rows", rows.len());
    info!("Finished reading CSV file: {}", path.display());
    Ok(rows)
}

/// Build a `Tenant` from a CSV row. `row_number` is the 1-based data row
/// number, used only for error reporting.
///
/// `shop_id` is parsed here rather than left to the database, so a blank,
/// absent or non-numeric id fails before any statement is sent for that row.
/// Text columns the row stops short of become NULL.
pub fn parse_tenant(row: &CsvRow, row_number: usize) -> Result<Tenant, TenantRecordError> {
    let field = |column: &'static str| {
        if row.has_column(column) {
            Ok(row.get(column).map(str::to_string))
        } else {
            Err(TenantRecordError::MissingColumn {
                row: row_number,
                column,
            })
        }
    };

    let raw_id = field("shop_id")?.unwrap_or_default();
    let shop_id = raw_id
        .trim()
        .parse::<i32>()
        .map_err(|_| TenantRecordError::InvalidShopId {
            row: row_number,
            value: raw_id.clone(),
        })?;

    Ok(Tenant {
        shop_id,
        shop_name: field("shop_name")?,
        user_name: field("user_name")?,
        user_email: field("user_email")?,
        user_phone: field("user_phone")?,
    })
}
