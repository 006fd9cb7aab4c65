//! Fatal errors. Disagreements between a clause and a document are *not*
//! errors; they are recorded as findings. What ends up here is a clause that
//! cannot be compiled, or a clause/document pair whose shapes are
//! structurally incompatible.
use thiserror::Error;

/// Raised while compiling a query clause.
#[derive(Debug, Error)]
pub enum ClauseError {
    #[error("invalid pattern at `{path}`: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern at `{path}` must be a string, found {found}")]
    NonStringPattern { path: String, found: &'static str },

    #[error("sequence at `{path}` must wrap exactly one clause, found {len}")]
    SequenceArity { path: String, len: usize },
}

/// Raised while walking a document with a compiled clause.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("shape mismatch at `{path}`: clause expects {expected}, document has {found}")]
    ShapeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("clause sequence at `{path}` is empty")]
    EmptyClauseSequence { path: String },

    #[error("document sequence at `{path}` is empty")]
    EmptyDocumentSequence { path: String },
}

/// Human name of a JSON value's kind, used in error messages.
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
