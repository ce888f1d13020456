//! Canonical contract form and identity
//!
//! The canonical form of a contract is its text with all whitespace removed,
//! which is exactly the span of the accepted parse. Callables built from a
//! contract are stamped with this text, and function-typed slots compare it
//! verbatim.
//!
//! # Pipeline
//!
//! `contract text → parse → Schema::text() → SHA-256`
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **Syntactic**: `(str,)->str` and `(str,)->(str)` stay distinct

use sha2::{Digest, Sha256};

use crate::parser::ast::Schema;
use crate::parser::tokenizer::strip_whitespace;
use crate::Result;

/// Whitespace-free form of contract text, without validating it
pub fn canonical_text(text: &str) -> String {
    strip_whitespace(text)
}

/// Validate contract text and return its canonical form
///
/// # Errors
/// Returns `Unparseable` or `Ambiguous` for text that is not a contract.
pub fn normalize(text: &str) -> Result<String> {
    let schema = crate::parser::parse(text)?;
    Ok(schema.text().to_string())
}

/// SHA-256 of the canonical text, as lowercase hex
pub fn semantic_hash(schema: &Schema) -> String {
    let mut hasher = Sha256::new();
    hasher.update(schema.text().as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_canonical_text_strips_whitespace() {
        assert_eq!(canonical_text(" ( str , ) -> str "), "(str,)->str");
    }

    #[test]
    fn test_normalize_matches_schema_span() {
        let text = "(int : str,\n int) -> [str]";
        let schema = parse(text).unwrap();
        assert_eq!(normalize(text).unwrap(), schema.text());
        assert_eq!(
            schema.text(),
            format!("{}->{}", schema.input_text(), schema.output_text())
        );
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = normalize("( [int] , ) -> { str }").unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_rejects_invalid() {
        assert!(normalize("->").is_err());
        assert!(normalize("(a:b:c,) -> a").is_err());
    }

    #[test]
    fn test_redundant_parens_are_not_canonicalised() {
        let plain = normalize("(str,) -> str").unwrap();
        let parens = normalize("(str,) -> (str)").unwrap();
        assert_ne!(plain, parens);
    }

    // ── SHA-256 hash ───────────────────────────────────

    #[test]
    fn test_semantic_hash_is_hex_sha256() {
        let hash = semantic_hash(&parse("(str,) -> str").unwrap());
        assert_eq!(hash.len(), 64, "Hash should be 64 hex chars, got: {}", hash);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_semantic_hash_ignores_whitespace() {
        let a = semantic_hash(&parse("(str,)->str").unwrap());
        let b = semantic_hash(&parse(" ( str , )  ->  str ").unwrap());
        let c = semantic_hash(&parse("(int,)->str").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
