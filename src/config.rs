use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub inputs: InputsConfig,
    pub output: OutputConfig,
    pub cleaning: CleaningConfig,
    pub logging: LoggingConfig,
}

/// Locations of the two input extracts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub sales_path: String,
    pub customers_path: String,
}

/// Location of the enriched output dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

/// Fallback values applied by the cleaning stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Two-letter state code used when the extract has a blank state
    pub default_estado: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inputs: InputsConfig {
                sales_path: "varejo.csv".to_string(),
                customers_path: "cliente_varejo.csv".to_string(),
            },
            output: OutputConfig {
                path: "vendas_cliente_processado.csv".to_string(),
            },
            cleaning: CleaningConfig {
                default_estado: "MS".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&AppConfig::default())?)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix
            .add_source(Environment::with_prefix("VAREJO").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {e}"))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        InputValidator::validate_csv_path(&self.sales_path())?;
        InputValidator::validate_csv_path(&self.customers_path())?;
        InputValidator::validate_csv_path(&self.output_path())?;
        InputValidator::validate_uf(&self.cleaning.default_estado)?;
        InputValidator::validate_log_level(&self.logging.level)?;
        InputValidator::validate_log_format(&self.logging.format)?;

        Ok(())
    }

    /// Get the sales extract path
    #[must_use]
    pub fn sales_path(&self) -> PathBuf {
        PathBuf::from(&self.inputs.sales_path)
    }

    /// Get the customer extract path
    #[must_use]
    pub fn customers_path(&self) -> PathBuf {
        PathBuf::from(&self.inputs.customers_path)
    }

    /// Get the enriched output path
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output.path)
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
