//! Schema checker: walks a parse tree against a runtime value
//!
//! The checker dispatches on the production of each schema node and
//! returns either a match or a diagnostic fragment (see [`crate::render`])
//! describing what it found instead.
//!
//! # Composition
//!
//! - Forwarding nodes (`typ := t`, `t := '(' typ ')'`, `t := list` ...)
//!   return their child's outcome unchanged.
//! - Homogeneous containers stop at the first failing element or entry.
//! - Multi-element tuples check every position and report all of them,
//!   leaving matching positions as their schema text.
//!
//! Errors are reserved for contracts that could never be satisfied and
//! for schema shapes the checker has no case for.

use crate::parser::ast::{NodeId, ParseTree, Schema};
use crate::parser::grammar::Production;
use crate::render::{self, Side};
use crate::value::Value;
use crate::{Error, Result};

/// Outcome of checking one value: `None` on a match, else the fragment
pub type Mismatch = Option<String>;

/// Checks values against nodes of one parse tree
#[derive(Debug, Clone, Copy)]
pub struct Checker<'t> {
    tree: &'t ParseTree,
}

impl<'t> Checker<'t> {
    pub fn new(tree: &'t ParseTree) -> Self {
        Checker { tree }
    }

    /// Check `value` against the schema node `node`
    pub fn check(&self, node: NodeId, value: &Value) -> Result<Mismatch> {
        let production = self.tree.production(node).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "cannot check against terminal `{}`",
                self.tree.span(node)
            ))
        })?;

        match production {
            Production::TypNullable if value.is_none() => Ok(None),
            Production::TypNullable
            | Production::TypPlain
            | Production::TTuple
            | Production::TList
            | Production::TSet
            | Production::TDict
            | Production::TFun => self.check(self.tree.child(node, 0)?, value),
            Production::TParen => self.check(self.tree.child(node, 1)?, value),
            Production::TName => self.check_name(node, value),
            Production::FunArrow => self.check_function(node, value),
            Production::ListOf => self.check_sequence(node, value),
            Production::SetOf => self.check_sequence(node, value),
            Production::DictOf => self.check_dict(node, value),
            Production::TupleEmpty => Ok(match value {
                Value::Tuple(items) if items.is_empty() => None,
                other => Some(render::highlight(other.type_name())),
            }),
            Production::TupleElems => self.check_tuple(node, value),
            Production::MoreEmpty | Production::MoreLast | Production::MoreNext => {
                Err(Error::InvariantViolation(format!(
                    "tuple tail `{}` checked outside its tuple",
                    self.tree.span(node)
                )))
            }
        }
    }

    fn check_name(&self, node: NodeId, value: &Value) -> Result<Mismatch> {
        let expected = self.tree.span(self.tree.child(node, 0)?);
        if value.type_name() == expected {
            Ok(None)
        } else {
            Ok(Some(render::highlight(value.type_name())))
        }
    }

    /// Function-typed slot: compare the callable's stamped contract text
    fn check_function(&self, node: NodeId, value: &Value) -> Result<Mismatch> {
        let expected = self.tree.span(node);
        let func = match value {
            Value::Function(func) => func,
            other => return Ok(Some(render::highlight(other.type_name()))),
        };
        match func.contract() {
            None => Err(Error::InvalidContract {
                expected: expected.to_string(),
                reason: "received a function with no contract attached".to_string(),
            }),
            Some(contract) if contract == expected => Ok(None),
            Some(contract) => Ok(Some(render::highlight(contract))),
        }
    }

    fn check_sequence(&self, node: NodeId, value: &Value) -> Result<Mismatch> {
        let element = self.tree.child(node, 1)?;
        let (items, open, close) = match (self.tree.production(node), value) {
            (Some(Production::ListOf), Value::List(items)) => (items, '[', ']'),
            (Some(Production::SetOf), Value::Set(items)) => (items, '{', '}'),
            (_, other) => return Ok(Some(render::highlight(other.type_name()))),
        };
        for item in items {
            if let Some(fragment) = self.check(element, item)? {
                return Ok(Some(render::container(open, &fragment, close)));
            }
        }
        Ok(None)
    }

    fn check_dict(&self, node: NodeId, value: &Value) -> Result<Mismatch> {
        let entries = match value {
            Value::Dict(entries) => entries,
            other => return Ok(Some(render::highlight(other.type_name()))),
        };
        let key_node = self.tree.child(node, 0)?;
        let value_node = self.tree.child(node, 2)?;
        for (k, v) in entries {
            let key = self.check(key_node, k)?;
            let val = self.check(value_node, v)?;
            if key.is_none() && val.is_none() {
                continue;
            }
            return Ok(Some(render::dict_entry(
                self.side(&key, key_node),
                self.side(&val, value_node),
            )));
        }
        Ok(None)
    }

    fn side<'a>(&'a self, fragment: &'a Mismatch, schema: NodeId) -> Side<'a> {
        match fragment {
            Some(f) => Side::Failed(f),
            None => Side::Passed(self.tree.span(schema)),
        }
    }

    /// Element nodes of a non-empty `fixed_tup`, in order
    fn tuple_elements(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut elements = vec![self.tree.child(node, 1)?];
        let mut tail = self.tree.child(node, 3)?;
        loop {
            match self.tree.production(tail) {
                Some(Production::MoreEmpty) => break,
                Some(Production::MoreLast) => {
                    elements.push(self.tree.child(tail, 0)?);
                    break;
                }
                Some(Production::MoreNext) => {
                    elements.push(self.tree.child(tail, 0)?);
                    tail = self.tree.child(tail, 2)?;
                }
                _ => {
                    return Err(Error::InvariantViolation(format!(
                        "malformed tuple tail `{}`",
                        self.tree.span(tail)
                    )))
                }
            }
        }
        Ok(elements)
    }

    fn check_tuple(&self, node: NodeId, value: &Value) -> Result<Mismatch> {
        let elements = self.tuple_elements(node)?;
        if let [element] = elements.as_slice() {
            return self.check_single(*element, value);
        }

        let items = match value {
            Value::Tuple(items) => items,
            other => return Ok(Some(render::highlight(other.type_name()))),
        };
        if items.len() != elements.len() {
            return Ok(Some(render::wildcard_tuple(items.len())));
        }

        let mut failed = false;
        let mut parts = Vec::with_capacity(elements.len());
        for (element, item) in elements.iter().zip(items) {
            match self.check(*element, item)? {
                Some(fragment) => {
                    failed = true;
                    parts.push(fragment);
                }
                None => parts.push(self.tree.span(*element).to_string()),
            }
        }
        Ok(failed.then(|| render::positions(&parts)))
    }

    /// `(typ,)`: any index-accessible value whose first element matches
    fn check_single(&self, element: NodeId, value: &Value) -> Result<Mismatch> {
        let items = match value.as_sequence() {
            Some(items) => items,
            None => return Ok(Some(render::highlight(value.type_name()))),
        };
        match items.first() {
            None => Ok(Some(render::missing_element())),
            Some(first) => Ok(self.check(element, first)?.map(|f| render::single(&f))),
        }
    }
}

impl Schema {
    /// Check an argument tuple against the input side
    ///
    /// # Errors
    /// `InputMismatch` carrying the composed fragment, or `InvalidContract`
    /// when a function-typed argument has no contract attached.
    pub fn check_input(&self, args: &Value) -> Result<()> {
        match Checker::new(self.tree()).check(self.input(), args)? {
            None => Ok(()),
            Some(got) => {
                tracing::debug!(contract = %self.text(), %got, "input mismatch");
                Err(render::input_mismatch(self.input_text(), got))
            }
        }
    }

    /// Check a result against the output side
    ///
    /// # Errors
    /// `OutputMismatch` carrying the composed fragment, or `InvalidContract`
    /// when a function-typed result has no contract attached.
    pub fn check_output(&self, result: &Value) -> Result<()> {
        match Checker::new(self.tree()).check(self.output(), result)? {
            None => Ok(()),
            Some(got) => {
                tracing::debug!(contract = %self.text(), %got, "output mismatch");
                Err(render::output_mismatch(self.output_text(), got))
            }
        }
    }
}
