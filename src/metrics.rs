use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

use crate::report::RunReport;

/// Metrics collection for pipeline runs
///
/// All metrics are no-ops until a recorder is installed by the embedding
/// application, so recording is always safe to call.
pub struct PipelineMetrics {
    // Volume metrics
    pub sales_rows_total: &'static str,
    pub customer_rows_total: &'static str,
    pub rows_enriched_total: &'static str,

    // Cleaning fallback metrics
    pub prices_imputed_total: &'static str,
    pub states_defaulted_total: &'static str,
    pub rows_dropped_by_filter_total: &'static str,
    pub duplicate_customers_dropped_total: &'static str,

    // Enrichment fallback metrics
    pub join_misses_total: &'static str,
    pub dates_unparsed_total: &'static str,
    pub states_unmapped_total: &'static str,

    // Run outcome metrics
    pub runs_total: &'static str,
    pub run_failures_total: &'static str,
    pub output_failures_total: &'static str,
    pub run_duration: &'static str,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self {
            sales_rows_total: "varejo_etl_sales_rows_total",
            customer_rows_total: "varejo_etl_customer_rows_total",
            rows_enriched_total: "varejo_etl_rows_enriched_total",

            prices_imputed_total: "varejo_etl_prices_imputed_total",
            states_defaulted_total: "varejo_etl_states_defaulted_total",
            rows_dropped_by_filter_total: "varejo_etl_rows_dropped_by_filter_total",
            duplicate_customers_dropped_total: "varejo_etl_duplicate_customers_dropped_total",

            join_misses_total: "varejo_etl_join_misses_total",
            dates_unparsed_total: "varejo_etl_dates_unparsed_total",
            states_unmapped_total: "varejo_etl_states_unmapped_total",

            runs_total: "varejo_etl_runs_total",
            run_failures_total: "varejo_etl_run_failures_total",
            output_failures_total: "varejo_etl_output_failures_total",
            run_duration: "varejo_etl_run_duration_seconds",
        }
    }
}

impl PipelineMetrics {
    /// Register descriptions for all pipeline metrics
    pub fn describe(&self) {
        describe_counter!(self.sales_rows_total, "Rows read from the sales extract");
        describe_counter!(
            self.customer_rows_total,
            "Rows read from the customer extract"
        );
        describe_counter!(self.rows_enriched_total, "Rows in the enriched dataset");
        describe_counter!(
            self.prices_imputed_total,
            "Blank prices filled with the column mean"
        );
        describe_counter!(
            self.states_defaulted_total,
            "Blank state codes filled with the configured default"
        );
        describe_counter!(
            self.rows_dropped_by_filter_total,
            "Rows dropped by the price sanity filter"
        );
        describe_counter!(
            self.duplicate_customers_dropped_total,
            "Duplicate customer rows dropped"
        );
        describe_counter!(self.join_misses_total, "Sales without a matching customer");
        describe_counter!(
            self.dates_unparsed_total,
            "Transaction dates that could not be parsed"
        );
        describe_counter!(
            self.states_unmapped_total,
            "State codes outside the federation table"
        );
        describe_counter!(self.runs_total, "Pipeline runs started");
        describe_counter!(self.run_failures_total, "Pipeline runs that failed");
        describe_counter!(
            self.output_failures_total,
            "Runs whose output file could not be written"
        );
        describe_histogram!(self.run_duration, "Pipeline run duration in seconds");
    }

    /// Record the counters of a completed run
    pub fn record_run(&self, report: &RunReport) {
        counter!(self.sales_rows_total).increment(report.sales_rows_loaded as u64);
        counter!(self.customer_rows_total).increment(report.customer_rows_loaded as u64);
        counter!(self.rows_enriched_total).increment(report.rows_enriched as u64);

        counter!(self.prices_imputed_total).increment(report.prices_imputed as u64);
        counter!(self.states_defaulted_total).increment(report.states_defaulted as u64);
        counter!(self.rows_dropped_by_filter_total).increment(report.rows_dropped_by_filter as u64);
        counter!(self.duplicate_customers_dropped_total)
            .increment(report.duplicate_customers_dropped as u64);

        counter!(self.join_misses_total).increment(report.join_misses as u64);
        counter!(self.dates_unparsed_total).increment(report.dates_unparsed as u64);
        counter!(self.states_unmapped_total).increment(report.states_unmapped as u64);

        if !report.output_written {
            counter!(self.output_failures_total).increment(1);
        }
    }

    /// Record a run outcome with its duration
    pub fn record_outcome(&self, duration: Duration, success: bool) {
        counter!(self.runs_total).increment(1);
        if !success {
            counter!(self.run_failures_total).increment(1);
        }
        histogram!(self.run_duration).record(duration.as_secs_f64());
    }
}

/// Timing wrapper that records a run outcome when finished
pub struct MetricsTimer {
    collector: PipelineMetrics,
    start: std::time::Instant,
}

impl MetricsTimer {
    #[must_use]
    pub fn new(collector: PipelineMetrics) -> Self {
        Self {
            collector,
            start: std::time::Instant::now(),
        }
    }

    pub fn finish(self, success: bool) {
        self.collector.record_outcome(self.start.elapsed(), success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        let collector = PipelineMetrics::default();
        assert_eq!(collector.sales_rows_total, "varejo_etl_sales_rows_total");
        assert_eq!(collector.run_duration, "varejo_etl_run_duration_seconds");
    }

    #[test]
    fn test_recording_without_a_recorder_is_a_noop() {
        let collector = PipelineMetrics::default();
        let report = RunReport {
            sales_rows_loaded: 10,
            prices_imputed: 2,
            ..RunReport::default()
        };

        // Must not panic when no global recorder is installed.
        collector.describe();
        collector.record_run(&report);
        collector.record_outcome(Duration::from_millis(5), true);
    }
}
