//! Error types for shape contracts
//!
//! All fallible operations return `Result<T, Error>`.
//! Setup-time errors (the contract itself is broken) are kept apart from
//! call-time mismatches (a caller or a body produced the wrong value).

use thiserror::Error;

/// Shape contract error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The grammar produced no full-span parse
    #[error("contract could not be parsed: `{contract}`")]
    Unparseable { contract: String },

    /// The grammar produced more than one full-span parse
    #[error("contract is ambiguous ({parses} parses): `{contract}`")]
    Ambiguous { contract: String, parses: usize },

    /// The argument tuple did not satisfy the input side
    #[error("expected input is `{expected}`, but got `{got}`")]
    InputMismatch { expected: String, got: String },

    /// The body's result did not satisfy the output side
    #[error("expected output is `{expected}`, but got `{got}`")]
    OutputMismatch { expected: String, got: String },

    /// A function-typed slot can never be satisfied (discovered lazily)
    #[error("invalid contract `{expected}`: {reason}")]
    InvalidContract { expected: String, reason: String },

    /// The checker reached a schema shape it has no case for
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    /// A value could not be decoded from its external form
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl Error {
    /// True for errors that mean the contract itself is unusable
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            Error::Unparseable { .. } | Error::Ambiguous { .. } | Error::InvalidContract { .. }
        )
    }

    /// True for input/output value mismatches
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Error::InputMismatch { .. } | Error::OutputMismatch { .. })
    }
}

/// Result type alias for shape contract operations
pub type Result<T> = std::result::Result<T, Error>;
