//! Runtime values checked against schemas
//!
//! Values carry an explicit kind tag, so the checker dispatches on an
//! enumeration instead of asking a live type registry. User-defined types
//! appear as [`Value::Instance`] with the name they were registered under.
//!
//! Callables are paired with an optional sidecar contract text at
//! construction time. A function-typed slot compares that text, it never
//! calls the function.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{Error, Result};

/// Body of a callable value
pub type Body = Arc<dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync>;

/// A callable value and the contract it was built to satisfy, if any
#[derive(Clone)]
pub struct Function {
    contract: Option<String>,
    body: Body,
}

impl Function {
    /// A plain callable with no contract attached
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Function {
            contract: None,
            body: Arc::new(body),
        }
    }

    pub(crate) fn with_contract(contract: String, body: Body) -> Self {
        Function {
            contract: Some(contract),
            body,
        }
    }

    /// Canonical contract text stamped at construction
    pub fn contract(&self) -> Option<&str> {
        self.contract.as_deref()
    }

    pub fn call(&self, args: Vec<Value>) -> Result<Value> {
        (self.body)(args)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body) && self.contract == other.contract
    }
}

/// A tagged runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null sentinel
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Fixed-arity heterogeneous sequence
    Tuple(Vec<Value>),
    List(Vec<Value>),
    /// Elements in insertion order
    Set(Vec<Value>),
    /// Entries in insertion order
    Dict(Vec<(Value, Value)>),
    Function(Function),
    /// Value of a user-registered named type
    Instance {
        type_name: String,
        fields: BTreeMap<String, Value>,
    },
}

impl Value {
    /// Runtime type name compared against `TYPE_NAME` leaves
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Instance { type_name, .. } => type_name,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Elements of an index-accessible value (tuple or list)
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(entries.into_iter().collect())
    }

    /// A value of a registered named type
    pub fn instance(type_name: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Value::Instance {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Decode a value from JSON
    ///
    /// Plain JSON maps onto `None`, `bool`, `int`, `float`, `str`, `list` and
    /// string-keyed `dict`. Kinds JSON cannot express use a tagged object:
    /// `{"$tuple": [..]}`, `{"$set": [..]}`, `{"$dict": [[k, v], ..]}`,
    /// `{"$bytes": "text"}` and `{"$instance": "Name", "fields": {..}}`.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(Error::InvalidValue(format!("number out of range: {}", n)));
                }
            }
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::List(decode_items(items)?),
            Json::Object(map) => {
                if let Some(items) = map.get("$tuple") {
                    Value::Tuple(decode_items(expect_array(items, "$tuple")?)?)
                } else if let Some(items) = map.get("$set") {
                    Value::Set(decode_items(expect_array(items, "$set")?)?)
                } else if let Some(entries) = map.get("$dict") {
                    let mut out = Vec::new();
                    for entry in expect_array(entries, "$dict")? {
                        match entry.as_array().map(Vec::as_slice) {
                            Some([k, v]) => out.push((Value::from_json(k)?, Value::from_json(v)?)),
                            _ => {
                                return Err(Error::InvalidValue(format!(
                                    "$dict entries must be [key, value] pairs, got {}",
                                    entry
                                )))
                            }
                        }
                    }
                    Value::Dict(out)
                } else if let Some(text) = map.get("$bytes") {
                    let text = text.as_str().ok_or_else(|| {
                        Error::InvalidValue("$bytes must hold a string".to_string())
                    })?;
                    Value::Bytes(text.as_bytes().to_vec())
                } else if let Some(name) = map.get("$instance") {
                    let type_name = name.as_str().ok_or_else(|| {
                        Error::InvalidValue("$instance must name a type".to_string())
                    })?;
                    let mut fields = BTreeMap::new();
                    if let Some(Json::Object(raw)) = map.get("fields") {
                        for (k, v) in raw {
                            fields.insert(k.clone(), Value::from_json(v)?);
                        }
                    }
                    Value::instance(type_name, fields)
                } else {
                    let mut out = Vec::with_capacity(map.len());
                    for (k, v) in map {
                        out.push((Value::Str(k.clone()), Value::from_json(v)?));
                    }
                    Value::Dict(out)
                }
            }
        })
    }
}

fn expect_array<'a>(json: &'a serde_json::Value, tag: &str) -> Result<&'a Vec<serde_json::Value>> {
    json.as_array()
        .ok_or_else(|| Error::InvalidValue(format!("{} must hold an array", tag)))
}

fn decode_items(items: &[serde_json::Value]) -> Result<Vec<Value>> {
    items.iter().map(Value::from_json).collect()
}

fn write_joined(f: &mut std::fmt::Formatter<'_>, items: &[Value]) -> std::fmt::Result {
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    Ok(())
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Value::Set(items) if items.is_empty() => write!(f, "set()"),
            Value::Set(items) => {
                write!(f, "{{")?;
                write_joined(f, items)?;
                write!(f, "}}")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => match func.contract() {
                Some(contract) => write!(f, "<function {}>", contract),
                None => write!(f, "<function>"),
            },
            Value::Instance { type_name, fields } => {
                write!(f, "{}(", type_name)?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}
