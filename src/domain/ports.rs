use crate::domain::model::{OrderRow, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn catalog_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn cooldown_secs(&self) -> u64;
}

/// One logical operation against the external text-generation service.
/// Opaque, possibly slow, possibly failing; no retry at this layer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<'a, T: TextGenerator + ?Sized> TextGenerator for &'a T {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

/// Delay policy applied after every processed wilaya, injected so the rate
/// limiting is testable without real time passing.
pub trait Cooldown: Send + Sync {
    fn wait(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// Observable progress of the resolver loop, as a fraction in `0.0..=1.0`.
pub trait ProgressSink: Send + Sync {
    fn update(&self, fraction: f64);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<OrderRow>>;
    async fn transform(&self, rows: Vec<OrderRow>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
