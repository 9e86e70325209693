use crate::core::assign::assign;
use crate::core::catalog::CommuneCatalog;
use crate::core::clean::{clean_csv, render_manifest};
use crate::core::resolver::RegionResolver;
use crate::core::{ConfigProvider, Pipeline, Storage, TextGenerator, TransformResult};
use crate::domain::model::OrderRow;
use crate::utils::cancel::CancelToken;
use crate::utils::cooldown::FixedCooldown;
use crate::utils::error::{EtlError, Result};
use crate::utils::progress::LogProgress;

/// Extract reads the raw order export, transform resolves and assigns the
/// geographic fields, load writes the finished manifest. The transform result
/// is an explicit value owned by the caller; no state survives the run.
pub struct ManifestPipeline<S: Storage, C: ConfigProvider, G: TextGenerator> {
    storage: S,
    config: C,
    generator: G,
    cancel: CancelToken,
}

impl<S: Storage, C: ConfigProvider, G: TextGenerator> ManifestPipeline<S, C, G> {
    pub fn new(storage: S, config: C, generator: G) -> Self {
        Self {
            storage,
            config,
            generator,
            cancel: CancelToken::new(),
        }
    }

    /// Returns a handle that aborts the resolver loop between wilayas.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, G: TextGenerator> Pipeline for ManifestPipeline<S, C, G> {
    async fn extract(&self) -> Result<Vec<OrderRow>> {
        tracing::info!("📥 Reading raw order export: {}", self.config.input_file());
        let raw = self.storage.read_file(self.config.input_file()).await?;
        let rows = clean_csv(&raw)?;
        tracing::info!("📥 Extracted {} orders", rows.len());
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<OrderRow>) -> Result<TransformResult> {
        let catalog_raw = self.storage.read_file(self.config.catalog_file()).await?;
        let catalog = CommuneCatalog::from_csv(&catalog_raw)?;
        tracing::info!("📚 Loaded commune catalog with {} entries", catalog.len());

        let cooldown = FixedCooldown::from_secs(self.config.cooldown_secs());
        let resolver =
            RegionResolver::new(&self.generator, cooldown).with_cancel(self.cancel.clone());
        let resolutions = resolver.resolve(&rows, &catalog, &LogProgress).await;

        // A cancelled resolver hands back a mapping that only covers the
        // wilayas it visited. Joining against it would misreport the missing
        // entries as an integrity failure, so stop here instead.
        if self.cancel.is_cancelled() {
            tracing::warn!(
                "🛑 Run cancelled after {} of the wilaya lookups, discarding partial results",
                resolutions.len()
            );
            return Err(EtlError::Cancelled);
        }

        let enriched = assign(&rows, &resolutions)?;
        let mut unresolved: Vec<String> = resolutions
            .values()
            .filter(|r| r.is_unresolved())
            .map(|r| r.wilaya.clone())
            .collect();
        unresolved.sort();

        if !unresolved.is_empty() {
            tracing::warn!(
                "🔶 {} wilaya(s) left unresolved: {}",
                unresolved.len(),
                unresolved.join(", ")
            );
        }

        let manifest_csv = render_manifest(&enriched)?;
        Ok(TransformResult {
            rows: enriched,
            manifest_csv,
            unresolved,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let filename = format!(
            "manifest_{}.csv",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        let output_path = format!("{}/{}", self.config.output_path(), filename);

        tracing::debug!(
            "💾 Writing manifest ({} rows) to {}",
            result.rows.len(),
            output_path
        );
        self.storage
            .write_file(&output_path, result.manifest_csv.as_bytes())
            .await?;

        if !result.unresolved.is_empty() {
            let report = serde_json::to_string_pretty(&result.unresolved)?;
            let report_path = format!("{}/unresolved.json", self.config.output_path());
            self.storage
                .write_file(&report_path, report.as_bytes())
                .await?;
            tracing::info!("💾 Unresolved wilaya report written to {}", report_path);
        }

        Ok(output_path)
    }
}
