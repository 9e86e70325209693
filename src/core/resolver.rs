use crate::core::catalog::CommuneCatalog;
use crate::core::client::InferenceClient;
use crate::core::parser::ResponseParser;
use crate::domain::model::{OrderRow, Resolution};
use crate::domain::ports::{Cooldown, ProgressSink, TextGenerator};
use crate::utils::cancel::CancelToken;
use std::collections::HashMap;

/// The core control loop: one inference call per distinct wilaya value, in
/// first-occurrence order, strictly sequential. Failed lookups for a single
/// wilaya are recorded as unresolved entries and never abort the batch.
pub struct RegionResolver<G: TextGenerator, D: Cooldown> {
    client: InferenceClient<G>,
    parser: ResponseParser,
    cooldown: D,
    cancel: CancelToken,
}

impl<G: TextGenerator, D: Cooldown> RegionResolver<G, D> {
    pub fn new(generator: G, cooldown: D) -> Self {
        Self {
            client: InferenceClient::new(generator),
            parser: ResponseParser::new(),
            cooldown,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolves every distinct wilaya present in `rows`. The returned mapping
    /// covers all of them unless the run is cancelled, in which case the
    /// partial mapping built so far is returned as-is.
    pub async fn resolve(
        &self,
        rows: &[OrderRow],
        catalog: &CommuneCatalog,
        progress: &dyn ProgressSink,
    ) -> HashMap<String, Resolution> {
        // Deduplicate up front: first occurrence fixes the visit order, the
        // last occurrence supplies the address used for the call.
        let mut order: Vec<&str> = Vec::new();
        let mut addresses: HashMap<&str, &str> = HashMap::new();
        for row in rows {
            if !addresses.contains_key(row.wilaya.as_str()) {
                order.push(&row.wilaya);
            }
            addresses.insert(&row.wilaya, &row.adresse);
        }

        let total = order.len();
        tracing::info!(
            "🗺️ Resolving {} distinct wilayas across {} rows",
            total,
            rows.len()
        );

        let mut resolutions = HashMap::with_capacity(total);
        for (index, wilaya) in order.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "🛑 Resolution cancelled after {}/{} wilayas; partial mapping returned",
                    index,
                    total
                );
                break;
            }

            let adresse = addresses[wilaya];
            let resolution = self.resolve_one(wilaya, adresse, catalog).await;
            resolutions.insert(wilaya.to_string(), resolution);

            progress.update((index + 1) as f64 / total as f64);
            self.cooldown.wait().await;
        }

        resolutions
    }

    async fn resolve_one(
        &self,
        wilaya: &str,
        adresse: &str,
        catalog: &CommuneCatalog,
    ) -> Resolution {
        match self.client.infer(wilaya, adresse, catalog).await {
            Ok(raw) => {
                let reply = self.parser.parse(&raw);
                if reply.code.is_none() && reply.commune.is_none() {
                    tracing::warn!("🔶 Reply for wilaya '{}' matched no field", wilaya);
                }
                if let Some(commune) = reply.commune.as_deref() {
                    if !catalog.contains(commune) {
                        tracing::debug!(
                            "Commune '{}' for wilaya '{}' is not in the catalog",
                            commune,
                            wilaya
                        );
                    }
                }
                Resolution {
                    code: reply.code,
                    commune: reply.commune,
                    wilaya: wilaya.to_string(),
                    adresse: adresse.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!("❌ Lookup failed for wilaya '{}': {}", wilaya, e);
                Resolution::unresolved(wilaya, adresse)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TextGenerator;
    use crate::utils::cooldown::NoCooldown;
    use crate::utils::error::{EtlError, Result};
    use crate::utils::progress::NoProgress;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies per wilaya keyed by substring of the prompt; records every
    /// prompt so tests can assert on call volume and content.
    struct StubGenerator {
        replies: Vec<(&'static str, &'static str)>,
        failing: Vec<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn new(replies: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                replies,
                failing: Vec::new(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing_for(mut self, wilaya: &'static str) -> Self {
            self.failing.push(wilaya);
            self
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());

            for wilaya in &self.failing {
                // Delimited needle: a bare wilaya name like "Alger" would also
                // match the "in Algeria" text present in every prompt.
                if prompt.contains(&format!("For the wilaya: {} in", wilaya)) {
                    return Err(EtlError::InferenceError {
                        message: format!("stubbed outage for {}", wilaya),
                    });
                }
            }
            for (wilaya, reply) in &self.replies {
                if prompt.contains(&format!("For the wilaya: {} in", wilaya)) {
                    return Ok(reply.to_string());
                }
            }
            Ok(String::new())
        }
    }

    struct RecordingProgress {
        fractions: Mutex<Vec<f64>>,
    }

    impl RecordingProgress {
        fn new() -> Self {
            Self {
                fractions: Mutex::new(Vec::new()),
            }
        }

        fn fractions(&self) -> Vec<f64> {
            self.fractions.lock().unwrap().clone()
        }
    }

    impl crate::domain::ports::ProgressSink for RecordingProgress {
        fn update(&self, fraction: f64) {
            self.fractions.lock().unwrap().push(fraction);
        }
    }

    fn catalog() -> CommuneCatalog {
        CommuneCatalog::from_names(vec![
            "Bab El Oued".to_string(),
            "Hydra".to_string(),
            "Es Senia".to_string(),
        ])
        .unwrap()
    }

    fn row(wilaya: &str, adresse: &str) -> OrderRow {
        OrderRow::new("REF", "Nom", "0550", wilaya, adresse, "REF", "2500", "++")
    }

    #[tokio::test]
    async fn test_one_call_per_distinct_wilaya() {
        let generator = StubGenerator::new(vec![
            ("Alger", r#""code wilaya": "16", "nom commune": "Bab El Oued""#),
            ("Oran", r#""code wilaya": "31", "nom commune": "Es Senia""#),
        ]);
        let resolver = RegionResolver::new(&generator, NoCooldown);
        let rows = vec![row("Alger", "a1"), row("Oran", "b1"), row("Alger", "a2")];

        let mapping = resolver.resolve(&rows, &catalog(), &NoProgress).await;

        assert_eq!(mapping.len(), 2);
        assert_eq!(generator.prompts().len(), 2);
        assert_eq!(mapping["Alger"].code.as_deref(), Some("16"));
        assert_eq!(mapping["Oran"].commune.as_deref(), Some("Es Senia"));
    }

    #[tokio::test]
    async fn test_last_address_wins_for_repeated_wilaya() {
        let generator = StubGenerator::new(vec![(
            "Alger",
            r#""code wilaya": "16", "nom commune": "Hydra""#,
        )]);
        let resolver = RegionResolver::new(&generator, NoCooldown);
        let rows = vec![row("Alger", "first address"), row("Alger", "second address")];

        let mapping = resolver.resolve(&rows, &catalog(), &NoProgress).await;

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Second address"));
        assert!(!prompts[0].contains("First address"));
        assert_eq!(mapping["Alger"].adresse, "second address");
    }

    #[tokio::test]
    async fn test_single_failure_never_aborts_the_batch() {
        let generator = StubGenerator::new(vec![
            ("Alger", r#""code wilaya": "16", "nom commune": "Hydra""#),
            ("Blida", r#""code wilaya": "09", "nom commune": "Bab El Oued""#),
        ])
        .failing_for("Oran");
        let resolver = RegionResolver::new(&generator, NoCooldown);
        let rows = vec![row("Alger", "a"), row("Oran", "b"), row("Blida", "c")];

        let mapping = resolver.resolve(&rows, &catalog(), &NoProgress).await;

        assert_eq!(mapping.len(), 3);
        assert!(mapping["Oran"].is_unresolved());
        assert_eq!(mapping["Alger"].code.as_deref(), Some("16"));
        assert_eq!(mapping["Blida"].code.as_deref(), Some("09"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_records_unresolved_entry() {
        let generator = StubGenerator::new(vec![("Alger", "no labelled fields here")]);
        let resolver = RegionResolver::new(&generator, NoCooldown);
        let rows = vec![row("Alger", "a")];

        let mapping = resolver.resolve(&rows, &catalog(), &NoProgress).await;

        assert_eq!(mapping.len(), 1);
        assert!(mapping["Alger"].is_unresolved());
    }

    #[tokio::test]
    async fn test_progress_is_monotone_and_reaches_one() {
        let generator = StubGenerator::new(vec![
            ("Alger", r#""code wilaya": "16", "nom commune": "Hydra""#),
            ("Oran", r#""code wilaya": "31", "nom commune": "Es Senia""#),
        ]);
        let resolver = RegionResolver::new(&generator, NoCooldown);
        let rows = vec![row("Alger", "a"), row("Oran", "b"), row("Alger", "c")];

        let progress = RecordingProgress::new();
        resolver.resolve(&rows, &catalog(), &progress).await;

        let fractions = progress.fractions();
        assert_eq!(fractions, vec![0.5, 1.0]);
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_cancellation_returns_valid_partial_mapping() {
        let generator = StubGenerator::new(vec![
            ("Alger", r#""code wilaya": "16", "nom commune": "Hydra""#),
            ("Oran", r#""code wilaya": "31", "nom commune": "Es Senia""#),
        ]);

        /// Cancels the shared token on its first wait, so the second wilaya
        /// is never visited.
        struct CancelAfterFirst(CancelToken);
        impl Cooldown for CancelAfterFirst {
            async fn wait(&self) {
                self.0.cancel();
            }
        }

        let token = CancelToken::new();
        let resolver = RegionResolver::new(&generator, CancelAfterFirst(token.clone()))
            .with_cancel(token);
        let rows = vec![row("Alger", "a"), row("Oran", "b")];

        let mapping = resolver.resolve(&rows, &catalog(), &NoProgress).await;

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["Alger"].code.as_deref(), Some("16"));
        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_is_empty() {
        let generator = StubGenerator::new(vec![]);
        let token = CancelToken::new();
        token.cancel();
        let resolver = RegionResolver::new(&generator, NoCooldown).with_cancel(token);
        let rows = vec![row("Alger", "a")];

        let mapping = resolver.resolve(&rows, &catalog(), &NoProgress).await;

        assert!(mapping.is_empty());
        assert!(generator.prompts().is_empty());
    }
}
