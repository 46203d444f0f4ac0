//! Pipeline orchestration
//!
//! Runs the whole chain over the two extracts: load, clean, filter,
//! deduplicate, join, enrich, persist. Stages run in this fixed order and
//! each one finishes before the next starts.
//!
//! A missing input or an unreadable extract aborts the run. A failed
//! output write does not, the enriched rows and the report are still
//! returned to the caller.

use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::logging::OperationTimer;
use crate::metrics::PipelineMetrics;
use crate::models::EnrichedSale;
use crate::report::RunReport;
use crate::{cleaning, enrich, file_writer, join, loader};

/// The outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The enriched dataset, also written to the output file
    pub rows: Vec<EnrichedSale>,
    /// Counters describing what the run did
    pub report: RunReport,
}

/// The cleaning and enrichment pipeline, configured once and run to completion
pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration
    #[must_use]
    pub const fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline end to end
    ///
    /// Returns the enriched rows and the run report. The report's
    /// `output_written` flag records whether the output file landed on
    /// disk, a failed write is logged but does not fail the run.
    pub fn run(&self) -> Result<PipelineRun> {
        let timer = OperationTimer::new("pipeline_run");
        let sales_path = self.config.sales_path();
        let customers_path = self.config.customers_path();
        let output_path = self.config.output_path();

        info!(
            sales = %sales_path.display(),
            customers = %customers_path.display(),
            output = %output_path.display(),
            "Starting enrichment pipeline"
        );

        let mut report = RunReport::default();

        let mut sales = match loader::load_sales(&sales_path) {
            Ok(table) => table,
            Err(e) => {
                error!(error = %e, "Could not load the sales extract, aborting");
                return Err(e);
            }
        };
        let mut customers = match loader::load_customers(&customers_path) {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Could not load the customer extract, aborting");
                return Err(e);
            }
        };
        report.sales_rows_loaded = sales.rows.len();
        report.customer_rows_loaded = customers.len();

        cleaning::clean_sales(&mut sales, &self.config.cleaning.default_estado, &mut report)?;
        cleaning::filter_valid_prices(&mut sales, &mut report);
        cleaning::dedup_customers(&mut customers, &mut report);

        let has_data_column = sales.has_data_column;
        let joined = join::join_customers(sales.rows, &customers, &mut report);
        let rows = enrich::enrich_sales(joined, has_data_column, &mut report);
        report.rows_enriched = rows.len();

        match file_writer::write_enriched_csv(&rows, &output_path) {
            Ok(()) => {
                report.output_written = true;
            }
            Err(e) => {
                report.output_written = false;
                error!(
                    error = %e,
                    path = %output_path.display(),
                    "Could not write the enriched dataset, keeping the in-memory result"
                );
            }
        }

        report.log_summary();
        PipelineMetrics::default().record_run(&report);

        timer.finish();
        Ok(PipelineRun { rows, report })
    }
}
