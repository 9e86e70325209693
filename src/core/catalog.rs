use crate::utils::error::{EtlError, Result};

const NAME_COLUMN: &str = "nom communes";

/// Closed list of valid commune names, loaded once per run and shared
/// read-only by every inference call.
#[derive(Debug, Clone)]
pub struct CommuneCatalog {
    names: Vec<String>,
}

impl CommuneCatalog {
    pub fn from_names(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(EtlError::ConfigError {
                message: "commune catalog is empty".to_string(),
            });
        }
        Ok(Self { names })
    }

    /// Loads the `nom communes` column of the communes reference CSV.
    pub fn from_csv(raw: &[u8]) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(raw);
        let headers = reader.headers()?.clone();
        let column = headers
            .iter()
            .position(|h| h.trim() == NAME_COLUMN)
            .ok_or_else(|| EtlError::ConfigError {
                message: format!("communes file has no '{}' column", NAME_COLUMN),
            })?;

        let mut names = Vec::new();
        for record in reader.records() {
            let record = record?;
            if let Some(name) = record.get(column) {
                let name = name.trim();
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }

        Self::from_names(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
