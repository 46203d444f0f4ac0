//! Loading of the CSV extracts
//!
//! Reads the two input extracts into typed rows, failing fast on a missing
//! file, a missing required column or a malformed row. Blank fields become
//! `None` and are handled by the later stages.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::error::{EtlError, Result};
use crate::models::{
    CustomerRecord, SaleRecord, SalesTable, COL_DATA, REQUIRED_CUSTOMER_COLUMNS,
    REQUIRED_SALES_COLUMNS,
};

/// Load the sales extract, noting whether the optional `Data` column exists.
pub fn load_sales(path: &Path) -> Result<SalesTable> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    validate_columns(&headers, REQUIRED_SALES_COLUMNS, path)?;
    let has_data_column = headers.iter().any(|h| h == COL_DATA);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: SaleRecord = record.map_err(|source| EtlError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    debug!(
        path = %path.display(),
        rows = rows.len(),
        has_data_column,
        "Loaded sales extract"
    );
    Ok(SalesTable {
        rows,
        has_data_column,
    })
}

/// Load the customer extract.
pub fn load_customers(path: &Path) -> Result<Vec<CustomerRecord>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    validate_columns(&headers, REQUIRED_CUSTOMER_COLUMNS, path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: CustomerRecord = record.map_err(|source| EtlError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "Loaded customer extract");
    Ok(rows)
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    if !path.exists() {
        return Err(EtlError::MissingInput(path.to_path_buf()));
    }
    csv::Reader::from_path(path).map_err(|source| EtlError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn read_headers(reader: &mut csv::Reader<File>, path: &Path) -> Result<csv::StringRecord> {
    let headers = reader.headers().map_err(|source| EtlError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(headers.clone())
}

fn validate_columns(headers: &csv::StringRecord, required: &[&str], path: &Path) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(EtlError::MissingColumn {
                column: (*column).to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}
