//! Per-run accounting for the pipeline
//!
//! Every fallback the cleaning and enrichment stages apply silently in the
//! data (imputed prices, defaulted states, unknown labels) is counted here,
//! so a run can be audited after the fact.

use serde::Serialize;
use tracing::{info, warn};

/// Counters describing what one pipeline run did to the data.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Rows read from the sales extract
    pub sales_rows_loaded: usize,
    /// Rows read from the customer extract
    pub customer_rows_loaded: usize,
    /// Channel codes rewritten to their display name
    pub channels_expanded: usize,
    /// Department names that had spaces replaced
    pub departments_normalized: usize,
    /// Blank state codes filled with the configured default
    pub states_defaulted: usize,
    /// Blank prices filled with the column mean
    pub prices_imputed: usize,
    /// Rows dropped because the price did not undercut the freight-inclusive price
    pub rows_dropped_by_filter: usize,
    /// Duplicate customer rows dropped, keeping the first occurrence
    pub duplicate_customers_dropped: usize,
    /// Sales whose customer was absent from the customer extract
    pub join_misses: usize,
    /// Date values that could not be parsed
    pub dates_unparsed: usize,
    /// State codes outside the federation table
    pub states_unmapped: usize,
    /// Rows in the enriched dataset
    pub rows_enriched: usize,
    /// Whether the output file was written successfully
    pub output_written: bool,
}

impl RunReport {
    /// Whether any fallback fired during the run.
    #[must_use]
    pub const fn has_fallbacks(&self) -> bool {
        self.states_defaulted > 0
            || self.prices_imputed > 0
            || self.join_misses > 0
            || self.dates_unparsed > 0
            || self.states_unmapped > 0
    }

    /// Log the run outcome, warning on every fallback that fired.
    pub fn log_summary(&self) {
        info!(
            sales_rows = self.sales_rows_loaded,
            customer_rows = self.customer_rows_loaded,
            rows_enriched = self.rows_enriched,
            rows_dropped_by_filter = self.rows_dropped_by_filter,
            duplicate_customers_dropped = self.duplicate_customers_dropped,
            output_written = self.output_written,
            "Pipeline run complete"
        );

        if self.prices_imputed > 0 {
            warn!(
                count = self.prices_imputed,
                "Blank prices were filled with the column mean"
            );
        }
        if self.states_defaulted > 0 {
            warn!(
                count = self.states_defaulted,
                "Blank state codes were filled with the configured default"
            );
        }
        if self.join_misses > 0 {
            warn!(
                count = self.join_misses,
                "Sales had no matching customer and kept empty customer fields"
            );
        }
        if self.dates_unparsed > 0 {
            warn!(
                count = self.dates_unparsed,
                "Transaction dates could not be parsed and were left empty"
            );
        }
        if self.states_unmapped > 0 {
            warn!(
                count = self.states_unmapped,
                "State codes were outside the federation table and got no full name"
            );
        }
    }
}
