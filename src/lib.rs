//! Declarative pattern matching over decoded JSON.
//!
//! A query clause mirrors the shape of the documents it tests: objects name
//! expected fields, strings are regexes for leaf values, and a one-element
//! array descends into the first element of a document array. Walking a
//! document with a clause yields per-leaf findings, reduced to a [`Verdict`].
//!
//! ```
//! use json_clause::{Matcher, Verdict};
//! use serde_json::json;
//!
//! let matcher = Matcher::new(&json!({"name": "^Al.*$", "age": "^3[0-9]$"})).unwrap();
//! let verdict = matcher.compare(&json!({"name": "Alice", "age": "34"})).unwrap();
//! assert_eq!(verdict, Some(Verdict::AllMatch));
//! ```
pub mod clause;
pub mod error;
pub mod finding;
pub mod matcher;
pub mod verdict;
pub mod path_de;
pub mod jq_exec;

pub use clause::{Clause, Pattern};
pub use error::{ClauseError, MatchError};
pub use finding::{Finding, FindingValue, ResultSet};
pub use matcher::{with_full_match, Matcher};
pub use verdict::{overall_result, Verdict};
