//! Shapecheck Core - structural contracts over runtime values
//!
//! A contract is a small textual function type such as
//! `([int], str:int?) -> (str,) -> str`. This crate parses contracts with
//! an Earley chart parser and checks values against the resulting schema,
//! producing diagnostics that mark exactly which part of a value was wrong.
//!
//! # Architecture
//!
//! ```text
//! Contract text → Parser (Earley chart) → Schema
//!                                           ↓
//!                      Checker (value, schema node) → match | fragment
//!                                           ↓
//!                                Render → "expected input is `..`, but got `..`"
//! ```
//!
//! # Guarantees
//!
//! - **Strict**: contracts with zero or several parses are rejected up front
//! - **Deterministic**: same contract and value always give the same message
//! - **No coercion**: mismatches are reported, never repaired

pub mod cache;
pub mod checker;
pub mod contract;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod render;
pub mod value;

pub use checker::Checker;
pub use contract::{contract, Contract};
pub use error::{Error, Result};
pub use parser::ast::{Node, NodeId, ParseTree, Schema};
pub use parser::parse;
pub use value::{Function, Value};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_exclaim() {
        let exclaim = contract("(str,) -> str", |args| match args.as_slice() {
            [Value::Str(s)] => Ok(Value::Str(format!("{}!", s))),
            _ => Ok(Value::None),
        })
        .unwrap();
        assert_eq!(
            exclaim.call(vec![Value::from("hello")]).unwrap(),
            Value::from("hello!")
        );
        let err = exclaim.call(vec![Value::from(5)]).unwrap_err();
        assert!(err.is_mismatch());
        assert!(err.to_string().contains(">>int<<"));
    }

    #[test]
    fn test_schema_serializes_to_json() {
        let schema = parse("([int],) -> str?").unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        let nodes = json["tree"]["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), schema.tree().len());
        let root = json["tree"]["root"].as_u64().unwrap() as usize;
        assert_eq!(nodes[root]["span"], "([int],)->str?");
        assert_eq!(nodes[root]["production"], "fun_arrow");
    }

    #[test]
    fn test_version_is_package_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_determinism_100_iterations() {
        let text = "(int:str, int) -> int";
        let value = Value::tuple([
            Value::dict([(Value::from("hello"), Value::from(5))]),
            Value::from("derp"),
        ]);
        let first = parse(text).unwrap().check_input(&value).unwrap_err();
        for i in 0..100 {
            let result = parse(text).unwrap().check_input(&value).unwrap_err();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
