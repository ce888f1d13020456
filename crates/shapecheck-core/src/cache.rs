//! Process-wide memo of accepted schemas
//!
//! Contract texts are usually constants attached once to a callable, so the
//! same text gets parsed over and over. Schemas are keyed by canonical text;
//! rejected contracts are not remembered.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::normalizer::canonical_text;
use crate::parser::{self, ast::Schema};
use crate::Result;

static SCHEMAS: Lazy<Mutex<HashMap<String, Arc<Schema>>>> = Lazy::new(Default::default);

fn schemas() -> MutexGuard<'static, HashMap<String, Arc<Schema>>> {
    // A panic while holding the lock cannot leave a half-inserted schema
    SCHEMAS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Parse `text`, or return the schema already parsed for the same canonical text
pub fn schema_for(text: &str) -> Result<Arc<Schema>> {
    let key = canonical_text(text);
    if let Some(schema) = schemas().get(&key) {
        tracing::trace!(contract = %key, "schema cache hit");
        return Ok(Arc::clone(schema));
    }

    let schema = Arc::new(parser::parse(text)?);
    tracing::debug!(contract = %key, "schema cache miss");
    Ok(Arc::clone(schemas().entry(key).or_insert(schema)))
}

/// Number of memoized schemas
pub fn len() -> usize {
    schemas().len()
}
