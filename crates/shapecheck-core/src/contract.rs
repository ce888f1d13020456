//! Contracted callables
//!
//! A [`Contract`] pairs a schema with a body. Calling it:
//!
//! 1. Checks the argument tuple against the input side
//! 2. Runs the body
//! 3. Checks the result against the output side
//!
//! Both sides are reported through separate errors, so callers can tell a
//! bad argument from a body that broke its promise. Setup problems
//! (unparseable or ambiguous text) surface from [`Contract::new`] and no
//! callable is built.

use std::sync::Arc;

use crate::cache;
use crate::parser::ast::Schema;
use crate::value::{Body, Function, Value};
use crate::Result;

/// A body guarded by a parsed contract
#[derive(Clone)]
pub struct Contract {
    schema: Arc<Schema>,
    body: Body,
}

impl Contract {
    /// Parse `text` and guard `body` with it
    ///
    /// # Errors
    /// `Unparseable` or `Ambiguous` if `text` is not a single function type.
    pub fn new<F>(text: &str, body: F) -> Result<Self>
    where
        F: Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        let schema = cache::schema_for(text)?;
        Ok(Contract {
            schema,
            body: Arc::new(body),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Canonical contract text stamped on callables built from this contract
    pub fn text(&self) -> &str {
        self.schema.text()
    }

    /// Check `args`, run the body, check its result
    ///
    /// # Errors
    /// `InputMismatch` before the body runs, `OutputMismatch` after it,
    /// `InvalidContract` when a function-typed slot receives an
    /// uncontracted callable, or whatever error the body itself returns.
    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        self.schema.check_input(&Value::Tuple(args.clone()))?;
        let result = (self.body)(args)?;
        self.schema.check_output(&result)?;
        Ok(result)
    }

    /// A callable value stamped with this contract's canonical text
    pub fn into_function(self) -> Function {
        let text = self.text().to_string();
        let guarded = Arc::new(self);
        Function::with_contract(text, Arc::new(move |args| guarded.call(args)))
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("text", &self.text())
            .finish_non_exhaustive()
    }
}

impl From<Contract> for Value {
    fn from(contract: Contract) -> Self {
        Value::Function(contract.into_function())
    }
}

/// Build a contracted callable in one step
pub fn contract<F>(text: &str, body: F) -> Result<Function>
where
    F: Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static,
{
    Ok(Contract::new(text, body)?.into_function())
}
