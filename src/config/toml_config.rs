use crate::adapters::gemini;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-based configuration for scripted runs, mirroring the CLI surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub inference: InferenceConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Raw order export CSV.
    pub input: String,
    /// Communes reference CSV.
    pub catalog: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub cooldown_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn endpoint(&self) -> &str {
        self.inference
            .endpoint
            .as_deref()
            .unwrap_or(gemini::DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.inference.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> &str {
        &self.source.input
    }

    fn catalog_file(&self) -> &str {
        &self.source.catalog
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn cooldown_secs(&self) -> u64 {
        self.inference.cooldown_secs.unwrap_or(5)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_path("source.input", &self.source.input)?;
        validate_path("source.catalog", &self.source.catalog)?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_url("inference.endpoint", self.endpoint())?;
        validate_non_empty_string("inference.model", self.model())?;
        Ok(())
    }
}
