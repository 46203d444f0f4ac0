use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use varejo_etl::config::AppConfig;
use varejo_etl::logging::init_logging;
use varejo_etl::metrics::{MetricsTimer, PipelineMetrics};
use varejo_etl::pipeline::Pipeline;
use varejo_etl::validation::InputValidator;
use varejo_etl::{file_writer, loader};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cleaning and enrichment pipeline end to end
    Process {
        /// Path to the sales extract (overrides configuration)
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Path to the customer extract (overrides configuration)
        #[arg(long)]
        customers: Option<PathBuf>,

        /// Path for the enriched output (overrides configuration)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Inspect the input extracts without writing anything
    Check {
        /// Path to the sales extract (overrides configuration)
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Path to the customer extract (overrides configuration)
        #[arg(long)]
        customers: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    let _logging_guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(Path::new),
        config.logging.format == "json",
    )?;

    info!("Starting varejo-etl");

    // Parse command line arguments
    let cli = Cli::parse();

    // Process command
    match cli.command {
        Commands::Process {
            sales,
            customers,
            output,
            report,
        } => {
            let config = apply_overrides(config, sales, customers, output)?;
            run_process(config, report.as_deref())?;
        }
        Commands::Check { sales, customers } => {
            let config = apply_overrides(config, sales, customers, None)?;
            run_check(&config)?;
        }
    }

    Ok(())
}

/// Apply command line path overrides on top of the loaded configuration
fn apply_overrides(
    mut config: AppConfig,
    sales: Option<PathBuf>,
    customers: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<AppConfig> {
    if let Some(path) = sales {
        config.inputs.sales_path = path.to_string_lossy().into_owned();
    }
    if let Some(path) = customers {
        config.inputs.customers_path = path.to_string_lossy().into_owned();
    }
    if let Some(path) = output {
        config.output.path = path.to_string_lossy().into_owned();
    }

    config.validate()?;
    Ok(config)
}

/// Run the pipeline end to end
fn run_process(config: AppConfig, report_path: Option<&Path>) -> Result<()> {
    let metrics = PipelineMetrics::default();
    metrics.describe();
    let timer = MetricsTimer::new(metrics);

    let pipeline = Pipeline::new(config);
    let run = match pipeline.run() {
        Ok(run) => run,
        Err(e) => {
            timer.finish(false);
            return Err(e.into());
        }
    };
    timer.finish(true);

    if let Some(path) = report_path {
        file_writer::write_report_json(&run.report, path)?;
        info!(path = %path.display(), "Run report written");
    }

    if !run.report.output_written {
        warn!("Pipeline finished but the output file was not written");
    }

    Ok(())
}

/// Inspect the input extracts and log what a process run would find
fn run_check(config: &AppConfig) -> Result<()> {
    let sales_path = config.sales_path();
    let customers_path = config.customers_path();

    InputValidator::validate_input_file(&sales_path)?;
    InputValidator::validate_input_file(&customers_path)?;

    let sales = loader::load_sales(&sales_path)?;
    let customers = loader::load_customers(&customers_path)?;

    let missing_precos = sales.rows.iter().filter(|r| r.preco.is_none()).count();
    let missing_estados = sales.rows.iter().filter(|r| r.estado.is_none()).count();
    let missing_datas = if sales.has_data_column {
        sales.rows.iter().filter(|r| r.data.is_none()).count()
    } else {
        sales.rows.len()
    };

    let mut seen = HashSet::new();
    let duplicate_customers = customers
        .iter()
        .filter(|c| !seen.insert(c.cliente_log.as_str()))
        .count();

    info!(
        path = %sales_path.display(),
        rows = sales.rows.len(),
        has_data_column = sales.has_data_column,
        "Sales extract loaded"
    );
    info!(
        path = %customers_path.display(),
        rows = customers.len(),
        "Customer extract loaded"
    );
    info!(
        missing_precos,
        missing_estados, missing_datas, "Blank fields in the sales extract"
    );
    info!(duplicate_customers, "Duplicate customer keys");

    if !sales.rows.is_empty() && missing_precos == sales.rows.len() {
        warn!("Every price is blank, a process run would fail");
    }

    info!("Check complete");
    Ok(())
}
