use crate::domain::model::ParsedReply;
use regex::Regex;

/// Best-effort extraction of the two labelled fields from the raw generation
/// text. The two searches are independent: a missing code does not block the
/// commune, and vice versa. Malformed text is expected here, never an error.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    code_re: Regex,
    commune_re: Regex,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            code_re: Regex::new(r#""code wilaya":\s*"(\d{2})""#).unwrap(),
            commune_re: Regex::new(r#""nom commune":\s*"([^"]+)""#).unwrap(),
        }
    }

    pub fn parse(&self, raw: &str) -> ParsedReply {
        let code = self
            .code_re
            .captures(raw)
            .map(|caps| caps[1].to_string());
        let commune = self
            .commune_re
            .captures(raw)
            .map(|caps| caps[1].to_string());

        ParsedReply { code, commune }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_fields() {
        let parser = ResponseParser::new();
        let reply = parser.parse(r#""code wilaya": "16", "nom commune": "Algiers""#);

        assert_eq!(reply.code.as_deref(), Some("16"));
        assert_eq!(reply.commune.as_deref(), Some("Algiers"));
    }

    #[test]
    fn test_parse_missing_commune_keeps_code() {
        let parser = ResponseParser::new();
        let reply = parser.parse(r#"Here you go: "code wilaya": "31""#);

        assert_eq!(reply.code.as_deref(), Some("31"));
        assert_eq!(reply.commune, None);
    }

    #[test]
    fn test_parse_missing_code_keeps_commune() {
        let parser = ResponseParser::new();
        let reply = parser.parse(r#""nom commune": "Es Senia""#);

        assert_eq!(reply.code, None);
        assert_eq!(reply.commune.as_deref(), Some("Es Senia"));
    }

    #[test]
    fn test_parse_garbage_and_empty() {
        let parser = ResponseParser::new();

        assert_eq!(parser.parse(""), ParsedReply::default());
        assert_eq!(
            parser.parse("I could not determine the wilaya."),
            ParsedReply::default()
        );
    }

    #[test]
    fn test_parse_rejects_non_two_digit_codes() {
        let parser = ResponseParser::new();

        assert_eq!(parser.parse(r#""code wilaya": "1""#).code, None);
        assert_eq!(parser.parse(r#""code wilaya": "165""#).code, None);
    }

    #[test]
    fn test_parse_survives_surrounding_prose() {
        let parser = ResponseParser::new();
        let raw = "Sure! Based on the address,\n\"code wilaya\": \"09\",\n\"nom commune\": \"Blida\"\nLet me know if you need anything else.";
        let reply = parser.parse(raw);

        assert_eq!(reply.code.as_deref(), Some("09"));
        assert_eq!(reply.commune.as_deref(), Some("Blida"));
    }
}
