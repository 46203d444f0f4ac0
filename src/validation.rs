//! Validation utilities for configuration values and paths

use anyhow::{anyhow, Result};
use std::path::Path;

/// Validation utilities for configuration values and edge case handling
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a two-letter state code used as the cleaning default
    pub fn validate_uf(uf: &str) -> Result<()> {
        if uf.trim().is_empty() {
            return Err(anyhow!("State code cannot be empty"));
        }

        if uf.len() != 2 || !uf.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(anyhow!(
                "State code must be two uppercase letters, got '{uf}'"
            ));
        }

        Ok(())
    }

    /// Validate a CSV file path from the configuration
    pub fn validate_csv_path(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(anyhow!("File path cannot be empty"));
        }

        if path_str.len() > 4096 {
            return Err(anyhow!("File path too long (max 4096 characters)"));
        }

        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(anyhow!("Expected a .csv file path, got {path:?}"));
        }

        Ok(())
    }

    /// Validate a log level name
    pub fn validate_log_level(level: &str) -> Result<()> {
        match level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(anyhow!(
                "Invalid log level '{level}'. Must be one of: trace, debug, info, warn, error"
            )),
        }
    }

    /// Validate a log output format name
    pub fn validate_log_format(format: &str) -> Result<()> {
        match format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            _ => Err(anyhow!(
                "Invalid log format '{format}'. Must be one of: text, json"
            )),
        }
    }

    /// Validate that an input extract exists and is a regular file
    pub fn validate_input_file(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(anyhow!("Input file does not exist: {path:?}"));
        }

        if !path.is_file() {
            return Err(anyhow!("Input path is not a file: {path:?}"));
        }

        Ok(())
    }
}
