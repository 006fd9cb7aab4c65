//! Compiled query clauses.
//!
//! A clause is decoded JSON where:
//! - a string is a regular expression matched against the document value at the
//!   same position. The match must begin at the start of the subject but may
//!   end anywhere (`"abc"` matches `"abcdef"`);
//! - an object lists the fields the document must carry, each with its own
//!   nested clause;
//! - a one-element array means "descend into the first element of the
//!   document's array and match it against the wrapped clause".
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::{kind_name, ClauseError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub enum Clause {
    Leaf(Pattern),
    /// Field order is the order of the clause source, so finding paths are
    /// reported deterministically.
    Structure(IndexMap<String, Clause>),
    /// `None` is the empty sequence `[]`.
    Sequence(Option<Box<Clause>>),
}

/// A leaf regex, kept alongside the source text it was compiled from.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        // Validate the bare source first: wrapping can balance stray parens
        // (`a)|(b` compiles once wrapped).
        Regex::new(source)?;
        // `\A` pins the match to the start; the end stays open.
        let regex = Regex::new(&format!(r"\A(?:{source})"))?;
        Ok(Self { source: source.to_string(), regex })
    }
    pub fn source(&self) -> &str {
        &self.source
    }
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }
}

impl Clause {
    /// Compile a decoded clause. Every regex is compiled here, so an invalid
    /// pattern is reported before any document is looked at.
    pub fn from_value(value: &Value) -> Result<Self, ClauseError> {
        compile(value, "")
    }

    /// `{}` and `[]` produce no findings at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Clause::Leaf(_) => false,
            Clause::Structure(fields) => fields.is_empty(),
            Clause::Sequence(inner) => inner.is_none(),
        }
    }
}

impl TryFrom<&Value> for Clause {
    type Error = ClauseError;
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Clause::from_value(value)
    }
}

impl std::str::FromStr for Pattern {
    type Err = regex::Error;
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Pattern::new(source)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn compile(value: &Value, path: &str) -> Result<Clause, ClauseError> {
    match value {
        Value::String(source) => {
            let pattern = Pattern::new(source).map_err(|source| ClauseError::InvalidPattern {
                path: display_path(path),
                source,
            })?;
            Ok(Clause::Leaf(pattern))
        }
        Value::Object(map) => {
            let mut fields = IndexMap::with_capacity(map.len());
            for (name, nested) in map {
                let nested_path = format!("{path}/{name}");
                fields.insert(name.clone(), compile(nested, &nested_path)?);
            }
            Ok(Clause::Structure(fields))
        }
        Value::Array(items) => match items.as_slice() {
            [] => Ok(Clause::Sequence(None)),
            [inner] => Ok(Clause::Sequence(Some(Box::new(compile(inner, path)?)))),
            _ => Err(ClauseError::SequenceArity {
                path: display_path(path),
                len: items.len(),
            }),
        },
        other => Err(ClauseError::NonStringPattern {
            path: display_path(path),
            found: kind_name(other),
        }),
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "/".to_string() } else { path.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patterns_anchor_at_start_only() {
        let p = Pattern::new("abc").unwrap();
        assert!(p.is_match("abcdef"));
        assert!(!p.is_match("xabc"));
        let alt = Pattern::new("a|b").unwrap();
        assert!(alt.is_match("bz"));
        assert!(!alt.is_match("zb"));
    }

    #[test]
    fn anchoring_does_not_repair_unbalanced_patterns() {
        assert!(Pattern::new("a)|(b").is_err());
        let end = Pattern::new("$").unwrap();
        assert!(end.is_match(""));
        assert!(!end.is_match("a"));
    }

    #[test]
    fn structure_keeps_source_order() {
        let clause = Clause::from_value(&json!({"z": "1", "a": "2", "m": {"k": "3"}})).unwrap();
        let Clause::Structure(fields) = clause else { panic!("expected structure") };
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn sequence_shorthand_wraps_one_clause() {
        let clause = Clause::from_value(&json!({"items": [{"id": "^42$"}]})).unwrap();
        let Clause::Structure(fields) = clause else { panic!("expected structure") };
        assert!(matches!(fields["items"], Clause::Sequence(Some(_))));
        assert!(Clause::from_value(&json!([])).unwrap().is_empty());
        assert!(Clause::from_value(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn invalid_pattern_is_reported_with_path() {
        let err = Clause::from_value(&json!({"a": {"b": "(unclosed"}})).unwrap_err();
        match err {
            ClauseError::InvalidPattern { path, .. } => assert_eq!(path, "/a/b"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn non_string_leaves_and_wide_sequences_are_rejected() {
        assert!(matches!(
            Clause::from_value(&json!({"n": 3})),
            Err(ClauseError::NonStringPattern { found: "number", .. })
        ));
        assert!(matches!(
            Clause::from_value(&json!({"xs": ["a", "b"]})),
            Err(ClauseError::SequenceArity { len: 2, .. })
        ));
    }
}
