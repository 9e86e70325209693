use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting manifest ETL process");

        let rows = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} orders", rows.len());

        let result = self.pipeline.transform(rows).await?;
        tracing::info!(
            "🔄 Transformed {} rows ({} wilaya(s) unresolved)",
            result.rows.len(),
            result.unresolved.len()
        );

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Manifest saved to: {}", output_path);

        Ok(output_path)
    }
}
