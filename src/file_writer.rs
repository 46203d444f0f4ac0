//! File writing for the enriched dataset
//!
//! This module writes the enriched rows to the CSV file the downstream
//! dashboard reads, with a header row and no index column, plus the
//! optional JSON run report.

use crate::error::{EtlError, Result};
use crate::models::{EnrichedSale, OUTPUT_COLUMNS};
use crate::report::RunReport;
use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Write the enriched dataset to a CSV file.
///
/// Column names and order come from [`EnrichedSale`]. An empty dataset
/// still produces the header row.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn write_enriched_csv(rows: &[EnrichedSale], path: &Path) -> Result<()> {
    write_rows(rows, path).map_err(|source| EtlError::Persistence {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), rows = rows.len(), "Wrote enriched dataset");
    Ok(())
}

fn write_rows(rows: &[EnrichedSale], path: &Path) -> std::result::Result<(), csv::Error> {
    let mut writer = Writer::from_path(path)?;

    if rows.is_empty() {
        // serialize() only emits headers with the first row, so write them directly.
        writer.write_record(OUTPUT_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the run report as pretty-printed JSON.
pub fn write_report_json(report: &RunReport, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;

    debug!(path = %path.display(), "Wrote run report");
    Ok(())
}
