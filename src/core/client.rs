use crate::core::catalog::CommuneCatalog;
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;

/// Wraps the text-generation port for the one question this tool asks:
/// which wilaya code and which catalog commune match a delivery row.
/// No retry here; transport and service errors surface to the resolver.
#[derive(Debug, Clone)]
pub struct InferenceClient<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> InferenceClient<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub async fn infer(
        &self,
        wilaya: &str,
        adresse: &str,
        catalog: &CommuneCatalog,
    ) -> Result<String> {
        let prompt = build_prompt(
            &normalize_field(wilaya),
            &normalize_field(adresse),
            catalog.names(),
        );
        self.generator.generate(&prompt).await
    }
}

/// Trims and capitalizes the first letter; empty input stays an empty string.
pub fn normalize_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn build_prompt(wilaya: &str, adresse: &str, communes: &[String]) -> String {
    format!(
        "For the wilaya: {wilaya} in Algeria and address: {adresse}, provide the \
         'code wilaya' and 'nom commune'.\n\
         The 'nom commune' must be one of the following: {communes}.\n\
         If no commune from the list can be determined, fall back to the wilaya \
         name itself. If the literal name does not match any entry, attempt a \
         transliteration between Arabic and Latin scripts before falling back.\n\
         Use the following format:\n\
         \"code wilaya\": \"XX\",\n\
         \"nom commune\": \"XXXXX\"\n\
         Ensure the response contains only the code wilaya as a two-digit number \
         and the nom commune as a string from the provided list.",
        wilaya = wilaya,
        adresse = adresse,
        communes = communes.join(", "),
    )
}
