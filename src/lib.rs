//! Varejo ETL - Retail Sales Cleaning and Enrichment
//!
//! A Rust library for cleaning a raw retail sales extract, joining it with
//! customer data and enriching it with the categorical fields the sales
//! dashboard consumes.
//!
//! # Features
//!
//! - Load sales and customer extracts from CSV
//! - Normalize channels, departments, states and prices
//! - Filter rows failing the price sanity check
//! - Left join sales with deduplicated customers
//! - Derive price, age and income brackets, calendar fields and state names
//! - Write the enriched dataset plus a per-run fallback report

/// Cleaning, filtering and deduplication stages
pub mod cleaning;
/// Configuration management
pub mod config;
/// Enrichment stage and its lookup tables
pub mod enrich;
/// Error types
pub mod error;
/// Output file writing
pub mod file_writer;
/// Left join of sales against customers
pub mod join;
/// CSV extract loading
pub mod loader;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// Pipeline orchestration
pub mod pipeline;
/// Per-run fallback accounting
pub mod report;
/// Input validation and sanitization
pub mod validation;

// Re-export key components for easier access
pub use config::AppConfig;
pub use error::{EtlError, Result};
pub use models::{CustomerRecord, EnrichedSale, JoinedSale, SaleRecord, SalesTable};
pub use pipeline::{Pipeline, PipelineRun};
pub use report::RunReport;
