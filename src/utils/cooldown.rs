use crate::domain::ports::Cooldown;
use std::time::Duration;

/// Fixed post-lookup delay that keeps the run inside the generation service's
/// rate limits. The five-second default matches the provider's free tier.
#[derive(Debug, Clone)]
pub struct FixedCooldown {
    delay: Duration,
}

impl FixedCooldown {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl Default for FixedCooldown {
    fn default() -> Self {
        Self::from_secs(5)
    }
}

impl Cooldown for FixedCooldown {
    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// No-op policy for tests and for callers that rate-limit elsewhere.
#[derive(Debug, Clone, Default)]
pub struct NoCooldown;

impl Cooldown for NoCooldown {
    async fn wait(&self) {}
}
