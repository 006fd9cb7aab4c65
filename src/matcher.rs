//! The comparator: walks a document in lock-step with a compiled clause and
//! records one finding per leaf position visited.
//!
//! Two kinds of disagreement are kept apart:
//! - *recorded*: missing fields, failed patterns, an array where a leaf was
//!   expected. These become findings and the walk continues.
//! - *fatal*: the clause assumes an object or a non-empty array the document
//!   does not have. These abort the walk with a [`MatchError`].
//!
//! The split is asymmetric (array-vs-leaf is recorded, object-vs-leaf is
//! fatal). Callers that need every document classified should compile clauses
//! that only descend where the documents are known to have structure.
//!
//! Further sharp edges:
//! - sibling field paths accumulate: under clause `{"name": .., "age": ..}`
//!   the second finding is reported at `/name/age`, and under
//!   `{"a": {"b": .., "c": ..}, "d": ..}` the paths are `/a/b`, `/a/b/c` and
//!   `/a/d`. A missing field still extends the running path.
//! - a clause array must hold exactly one clause. Longer arrays are rejected
//!   when the clause is compiled ([`ClauseError::SequenceArity`]) instead of
//!   silently reading only their first element.
//!
//! The walk is plain recursion over the document depth. Cyclic values cannot
//! be built from decoded JSON, but very deep documents can exhaust the stack.
use rayon::prelude::*;
use serde_json::Value;

use crate::clause::Clause;
use crate::error::{kind_name, ClauseError, MatchError};
use crate::finding::{FindingValue, ResultSet};
use crate::verdict::{overall_result, Verdict};

#[derive(Debug, Clone)]
pub struct Matcher {
    clause: Clause,
}

impl Matcher {
    /// Compile `clause` and keep it as the default for every call.
    pub fn new(clause: &Value) -> Result<Self, ClauseError> {
        Ok(Self::from_clause(Clause::from_value(clause)?))
    }
    pub fn from_clause(clause: Clause) -> Self {
        Self { clause }
    }
    pub fn clause(&self) -> &Clause {
        &self.clause
    }

    /// Walk `document` with the stored clause into a fresh result set.
    pub fn compare_verbose<'a>(&self, document: &'a Value) -> Result<ResultSet<'a>, MatchError> {
        let mut results = ResultSet::new();
        self.compare_verbose_with(document, None, "", &mut results)?;
        Ok(results)
    }

    /// Walk `document` with `clause` (the stored clause when `None`), prefixing
    /// every finding path with `path` and appending findings to `results`.
    pub fn compare_verbose_with<'a>(
        &self,
        document: &'a Value,
        clause: Option<&Clause>,
        path: &str,
        results: &mut ResultSet<'a>,
    ) -> Result<(), MatchError> {
        let clause = clause.unwrap_or(&self.clause);
        if clause.is_empty() {
            return Ok(());
        }
        walk(clause, document, path, results)
    }

    pub fn compare(&self, document: &Value) -> Result<Option<Verdict>, MatchError> {
        let verdict = overall_result(&self.compare_verbose(document)?);
        log::debug!("verdict: {verdict:?}");
        Ok(verdict)
    }

    /// `Some(document)` only when every leaf matched.
    pub fn is_this_a_full_match<'a>(&self, document: &'a Value) -> Result<Option<&'a Value>, MatchError> {
        let verdict = self.compare(document)?;
        Ok((verdict == Some(Verdict::AllMatch)).then_some(document))
    }

    /// Keep the documents with at least one matching leaf, partial matches
    /// included, in input order.
    pub fn list_of_compares<'a, I>(&self, documents: I) -> Result<Vec<&'a Value>, MatchError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut kept = Vec::new();
        let mut seen = 0usize;
        for document in documents {
            seen += 1;
            if self.compare(document)?.is_some_and(|v| v.has_matches()) {
                kept.push(document);
            }
        }
        log::debug!("list_of_compares kept {} of {seen}", kept.len());
        Ok(kept)
    }

    /// Same selection as [`Matcher::list_of_compares`], with documents
    /// compared on the rayon pool. Output order follows input order.
    pub fn par_list_of_compares<'a>(&self, documents: &'a [Value]) -> Result<Vec<&'a Value>, MatchError> {
        let verdicts = documents
            .par_iter()
            .map(|document| self.compare(document))
            .collect::<Result<Vec<_>, _>>()?;
        let kept = documents
            .iter()
            .zip(verdicts)
            .filter(|(_, verdict)| verdict.is_some_and(|v| v.has_matches()))
            .map(|(document, _)| document)
            .collect::<Vec<_>>();
        log::debug!("par_list_of_compares kept {} of {}", kept.len(), documents.len());
        Ok(kept)
    }
}

/// Compile `clause` and hand `scope` a predicate equivalent to
/// [`Matcher::is_this_a_full_match`]. Nothing needs releasing afterwards.
pub fn with_full_match<R>(
    clause: &Value,
    scope: impl FnOnce(&dyn Fn(&Value) -> Result<Option<&Value>, MatchError>) -> R,
) -> Result<R, ClauseError> {
    let matcher = Matcher::new(clause)?;
    let predicate = full_match_predicate(|document| matcher.is_this_a_full_match(document));
    Ok(scope(&predicate))
}

// Pins the closure signature to a higher-ranked one so the returned reference
// borrows from the argument.
fn full_match_predicate<F>(f: F) -> F
where
    F: for<'d> Fn(&'d Value) -> Result<Option<&'d Value>, MatchError>,
{
    f
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn walk<'a>(
    clause: &Clause,
    document: &'a Value,
    path: &str,
    results: &mut ResultSet<'a>,
) -> Result<(), MatchError> {
    log::trace!("descend {path:?}");
    match (clause, document) {
        (Clause::Leaf(pattern), Value::String(subject)) => {
            if pattern.is_match(subject) {
                results.record(path, FindingValue::Matched(document));
            } else {
                results.record(path, FindingValue::ValueMismatch);
            }
        }
        // arrays under a leaf pattern and non-string scalars
        (Clause::Leaf(_), _) => results.record(path, FindingValue::ValueMismatch),
        (Clause::Structure(fields), Value::Object(map)) => {
            // one running path for the whole loop; siblings extend it
            let mut current = path.to_string();
            for (name, nested) in fields {
                current.push('/');
                current.push_str(name);
                match map.get(name) {
                    None => results.record(&current, FindingValue::KeyMissing),
                    Some(value) => walk(nested, value, &current, results)?,
                }
            }
        }
        (Clause::Structure(_), other) => {
            return Err(shape_mismatch(path, "object", other));
        }
        (Clause::Sequence(None), _) => {
            return Err(MatchError::EmptyClauseSequence { path: path.to_string() });
        }
        (Clause::Sequence(Some(inner)), Value::Array(items)) => {
            let first = items
                .first()
                .ok_or_else(|| MatchError::EmptyDocumentSequence { path: path.to_string() })?;
            walk(inner, first, path, results)?;
        }
        (Clause::Sequence(Some(_)), other) => {
            return Err(shape_mismatch(path, "array", other));
        }
    }
    Ok(())
}

fn shape_mismatch(path: &str, expected: &'static str, found: &Value) -> MatchError {
    MatchError::ShapeMismatch {
        path: path.to_string(),
        expected,
        found: kind_name(found),
    }
}
