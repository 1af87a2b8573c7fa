// demanda-core/src/domain/cleaning/text.rs

use std::collections::HashMap;

use crate::domain::cleaning::similarity;
use crate::domain::record::FieldValue;

/// Outcome of canonicalizing a value against a known vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalMatch {
    /// Already a known canonical value.
    Known,
    /// Close enough to a known value to auto-correct.
    Corrected { canonical: String, score: f64 },
    /// Unrecognized; passes through unchanged, flagged for manual review.
    Unknown { closest: Option<(String, f64)> },
}

/// Case/whitespace normalization plus variant-spelling canonicalization.
pub struct TextNormalizer {
    /// variant (already uppercased) -> canonical spelling
    aliases: HashMap<String, String>,
    similarity_threshold: f64,
}

impl TextNormalizer {
    pub fn new(aliases: &HashMap<String, String>, similarity_threshold: f64) -> Self {
        let aliases = aliases
            .iter()
            .map(|(variant, canonical)| (collapse(variant), collapse(canonical)))
            .collect();
        Self {
            aliases,
            similarity_threshold,
        }
    }

    /// Uppercase, trim, collapse internal whitespace, resolve known aliases.
    /// `"nan"` artifacts from upstream exports count as missing.
    pub fn normalize(&self, raw: &str) -> FieldValue {
        let collapsed = collapse(raw);
        if collapsed.is_empty() || collapsed == "NAN" {
            return FieldValue::Missing;
        }
        match self.aliases.get(&collapsed) {
            Some(canonical) => FieldValue::Text(canonical.clone()),
            None => FieldValue::Text(collapsed),
        }
    }

    /// Match a normalized value against the vocabulary configured for its column.
    pub fn canonicalize(&self, value: &str, vocabulary: &[String]) -> CanonicalMatch {
        if vocabulary.iter().any(|v| v == value) {
            return CanonicalMatch::Known;
        }
        match similarity::best_match(value, vocabulary.iter().map(String::as_str)) {
            Some((candidate, score)) if score >= self.similarity_threshold => {
                CanonicalMatch::Corrected {
                    canonical: candidate.to_string(),
                    score,
                }
            }
            Some((candidate, score)) => CanonicalMatch::Unknown {
                closest: Some((candidate.to_string(), score)),
            },
            None => CanonicalMatch::Unknown { closest: None },
        }
    }
}

fn collapse(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vec<String> {
        ["BRADESCO", "SANTANDER", "BV FINANCEIRA"]
            .map(String::from)
            .to_vec()
    }

    fn normalizer() -> TextNormalizer {
        let aliases = HashMap::from([("BANCO BRADESCO".to_string(), "BRADESCO".to_string())]);
        TextNormalizer::new(&aliases, 0.85)
    }

    #[test]
    fn test_whitespace_and_case_normalization() {
        let n = normalizer();
        assert_eq!(
            n.normalize("  julio   cesar "),
            FieldValue::Text("JULIO CESAR".into())
        );
        assert_eq!(n.normalize(""), FieldValue::Missing);
        assert_eq!(n.normalize("NaN"), FieldValue::Missing);
    }

    #[test]
    fn test_alias_table_resolution() {
        let n = normalizer();
        assert_eq!(
            n.normalize("banco bradesco"),
            FieldValue::Text("BRADESCO".into())
        );
    }

    #[test]
    fn test_close_variant_is_auto_corrected() {
        let n = normalizer();
        match n.canonicalize("SANTANDEER", &vocab()) {
            CanonicalMatch::Corrected { canonical, score } => {
                assert_eq!(canonical, "SANTANDER");
                assert!(score >= 0.85);
            }
            other => panic!("expected correction, got {other:?}"),
        }
    }

    #[test]
    fn test_distant_variant_passes_through_flagged() {
        let n = normalizer();
        match n.canonicalize("BANCO NOVO XYZ", &vocab()) {
            CanonicalMatch::Unknown { closest } => {
                assert!(closest.is_some());
            }
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_known_value_untouched() {
        let n = normalizer();
        assert_eq!(n.canonicalize("BRADESCO", &vocab()), CanonicalMatch::Known);
    }
}
