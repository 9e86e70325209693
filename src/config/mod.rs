pub mod cli;
pub mod toml_config;

use crate::adapters::gemini;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "manifest-etl")]
#[command(about = "Normalizes raw order exports into shipping manifests with resolved wilaya codes")]
pub struct CliConfig {
    /// Raw order export (CSV with mixed Arabic/French columns)
    #[arg(long)]
    pub input: String,

    /// Communes reference CSV with a 'nom communes' column
    #[arg(long, default_value = "data/communes.csv")]
    pub catalog: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = gemini::DEFAULT_BASE_URL)]
    pub api_endpoint: String,

    #[arg(long, default_value = gemini::DEFAULT_MODEL)]
    pub model: String,

    /// Delay after each wilaya lookup, in seconds
    #[arg(long, default_value = "5")]
    pub cooldown_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn input_file(&self) -> &str {
        &self.input
    }

    fn catalog_file(&self) -> &str {
        &self.catalog
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("catalog", &self.catalog)?;
        validate_path("output_path", &self.output_path)?;
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_non_empty_string("model", &self.model)?;
        Ok(())
    }
}

/// The generation service key never travels through CLI arguments or config
/// files; it is read from the environment (a local .env is honored).
pub fn api_key_from_env() -> Result<String> {
    std::env::var(API_KEY_VAR).map_err(|_| EtlError::MissingConfigError {
        field: API_KEY_VAR.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CliConfig {
        CliConfig {
            input: "orders.csv".to_string(),
            catalog: "communes.csv".to_string(),
            output_path: "./output".to_string(),
            api_endpoint: gemini::DEFAULT_BASE_URL.to_string(),
            model: gemini::DEFAULT_MODEL.to_string(),
            cooldown_secs: 5,
            verbose: false,
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut bad = config();
        bad.api_endpoint = "ftp://example.com".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut bad = config();
        bad.input = String::new();
        assert!(bad.validate().is_err());
    }
}
