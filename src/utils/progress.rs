use crate::domain::ports::ProgressSink;

/// Reports resolver progress through the tracing pipeline.
#[derive(Debug, Clone, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&self, fraction: f64) {
        tracing::info!("🗺️ Resolution progress: {:.0}%", fraction * 100.0);
    }
}

/// Silent sink for callers that do not surface progress.
#[derive(Debug, Clone, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _fraction: f64) {}
}
