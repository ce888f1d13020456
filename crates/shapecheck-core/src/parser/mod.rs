//! Contract parser: grammar table, Earley chart and parse trees
//!
//! Converts contract text into a [`Schema`].
//!
//! ```text
//! text → strip whitespace → Chart (predict / scan / complete) → full-span parses
//!                                                   ↓
//!                                 exactly one parse → Schema
//! ```

pub mod ast;
pub mod earley;
pub mod grammar;
pub mod tokenizer;

use ast::{ParseTree, Schema};
use earley::Chart;

use crate::{Error, Result};

/// Every full-span parse of `text` as a function type
///
/// Whitespace is removed first. An empty vector means the text is not a
/// contract at all; more than one entry means it is ambiguous.
pub fn parse_all(text: &str) -> Vec<ParseTree> {
    let input = tokenizer::strip_whitespace(text);
    let chart = Chart::build(&input);
    let parses = chart.parses();
    tracing::debug!(
        contract = %input,
        columns = chart.column_count(),
        states = chart.state_count(),
        parses = parses.len(),
        "built contract chart"
    );
    parses
}

/// Parse contract text into a schema
///
/// # Guarantees
/// - Deterministic: same input always produces the same schema
/// - Strict: ambiguous contracts are rejected, never resolved by preference
///
/// # Errors
/// Returns `Unparseable` when no parse exists and `Ambiguous` when more
/// than one does.
///
/// # Example
/// ```
/// let schema = shapecheck_core::parser::parse("(str,) -> str").unwrap();
/// assert_eq!(schema.text(), "(str,)->str");
/// ```
pub fn parse(text: &str) -> Result<Schema> {
    let input = tokenizer::strip_whitespace(text);
    let chart = Chart::build(&input);
    let count = chart.parse_count();
    tracing::debug!(
        contract = %input,
        columns = chart.column_count(),
        states = chart.state_count(),
        parses = count,
        "built contract chart"
    );
    match count {
        0 => Err(Error::Unparseable {
            contract: text.to_string(),
        }),
        1 => match chart.single_parse() {
            Some(tree) => Schema::from_tree(tree),
            None => Err(Error::InvariantViolation(format!(
                "lost the only parse of `{}`",
                input
            ))),
        },
        n => Err(Error::Ambiguous {
            contract: text.to_string(),
            parses: n,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar::Production;

    fn parse_err(text: &str) -> Error {
        parse(text).unwrap_err()
    }

    // ── Accepted contracts ─────────────────────────────

    #[test]
    fn test_parse_simple_contract() {
        let schema = parse("(str,) -> str").unwrap();
        assert_eq!(schema.text(), "(str,)->str");
        assert_eq!(schema.input_text(), "(str,)");
        assert_eq!(schema.output_text(), "str");
    }

    #[test]
    fn test_parse_whitespace_is_ignored() {
        let a = parse("( int , str )\n->\t[ int ]").unwrap();
        let b = parse("(int,str)->[int]").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_empty_input_tuple() {
        let schema = parse("() -> int").unwrap();
        let tree = schema.tree();
        assert_eq!(tree.production(schema.input()), Some(Production::TupleEmpty));
    }

    #[test]
    fn test_parse_curried_contract() {
        let schema = parse("(str,) -> (str,) -> str").unwrap();
        assert_eq!(schema.output_text(), "(str,)->str");
        let tree = schema.tree();
        let t = tree.child(schema.output(), 0).unwrap();
        assert_eq!(tree.production(t), Some(Production::TFun));
    }

    #[test]
    fn test_parse_containers() {
        for text in [
            "([int],) -> int",
            "({str},) -> int",
            "(int:str, int) -> int",
            "(int?,) -> int",
            "(((),),) -> ()",
            "((int),) -> (str)?",
            "([(int, str)],) -> {int:[str]}",
            "(a, b, c) -> d",
            "(a, b,) -> d",
        ] {
            assert!(parse(text).is_ok(), "{} should parse", text);
        }
    }

    #[test]
    fn test_parse_function_typed_argument() {
        let schema = parse("((int,) -> str, int) -> str").unwrap();
        assert_eq!(schema.input_text(), "((int,)->str,int)");
    }

    // ── Rejected contracts ─────────────────────────────

    #[test]
    fn test_bare_arrow_is_unparseable() {
        assert!(matches!(parse_err("->"), Error::Unparseable { .. }));
    }

    #[test]
    fn test_non_function_is_unparseable() {
        assert!(matches!(parse_err("str"), Error::Unparseable { .. }));
        assert!(matches!(parse_err("(str,)"), Error::Unparseable { .. }));
    }

    #[test]
    fn test_untupled_chain_is_rejected() {
        // the left side of `->` must be a tuple, so no bracketing applies
        assert!(matches!(
            parse_err("str -> str -> str"),
            Error::Unparseable { .. }
        ));
        assert!(parse_all("str -> str -> str").is_empty());
    }

    #[test]
    fn test_long_ambiguous_chain_is_counted() {
        // Catalan(3) bracketings of a:a:a:a
        assert!(matches!(
            parse_err("(a:a:a:a,) -> a"),
            Error::Ambiguous { parses: 5, .. }
        ));

        // Catalan(7)
        let links = vec!["a"; 8].join(":");
        match parse_err(&format!("({},) -> a", links)) {
            Error::Ambiguous { parses, .. } => assert_eq!(parses, 429),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_is_unparseable() {
        for text in ["", "(", "(str,) ->", "(str,) -> 1", "(str,) => str", "(,) -> str"] {
            assert!(
                matches!(parse_err(text), Error::Unparseable { .. }),
                "{:?} should be unparseable",
                text
            );
        }
    }

    #[test]
    fn test_nullable_function_tail_is_ambiguous() {
        match parse_err("(str,) -> (str,) -> str?") {
            Error::Ambiguous { parses, .. } => assert_eq!(parses, 2),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_dict_is_ambiguous() {
        assert!(matches!(
            parse_err("(a:b:c,) -> a"),
            Error::Ambiguous { .. }
        ));
        assert!(matches!(parse_err("(a:b?,) -> a"), Error::Ambiguous { .. }));
    }

    #[test]
    fn test_parse_all_reports_every_parse() {
        assert_eq!(parse_all("(a:b:c,) -> a").len(), 2);
        assert_eq!(parse_all("(a,) -> a").len(), 1);
        assert!(parse_all("a").is_empty());
    }

    // ── Round trip & determinism ───────────────────────

    #[test]
    fn test_reparse_of_canonical_text_is_identical() {
        for text in [
            "(str,) -> str",
            "(int:str, int) -> [ {str} ]",
            "(((),),) -> (int,) -> str",
        ] {
            let schema = parse(text).unwrap();
            let again = parse(schema.text()).unwrap();
            assert_eq!(schema, again);
        }
    }

    #[test]
    fn test_parse_determinism_100_iterations() {
        let text = "([int], int:str, (str,) -> str) -> {str}?";
        let first = parse(text).unwrap();
        for i in 0..100 {
            let result = parse(text).unwrap();
            assert_eq!(first, result, "Determinism failure at iteration {}", i);
        }
    }
}
