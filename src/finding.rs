//! Per-leaf outcomes of one traversal.
use serde::Serialize;
use serde::ser::Serializer;
use serde_json::Value;

/// One path-annotated outcome. Paths are slash-delimited field names in
/// descent order (`/a/b/c`); sequence descents do not add a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding<'a> {
    pub path: String,
    pub value: FindingValue<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FindingValue<'a> {
    /// The document leaf that satisfied the pattern.
    Matched(&'a Value),
    /// The clause names a field the document does not have.
    KeyMissing,
    /// The pattern failed, the leaf was not a string, or the document holds
    /// an array where the clause expects a leaf.
    ValueMismatch,
}

/// Accumulator for one traversal: `(mismatches, matches)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet<'a> {
    pub mismatches: Vec<Finding<'a>>,
    pub matches: Vec<Finding<'a>>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FindingValue<'_> {
    pub const KEY_MISSING: &'static str = "JSON_key_not_found";
    pub const VALUE_MISMATCH: &'static str = "JSON_value_mismatch";

    pub fn is_match(&self) -> bool {
        matches!(self, FindingValue::Matched(_))
    }
}

impl Serialize for FindingValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FindingValue::Matched(value) => value.serialize(serializer),
            FindingValue::KeyMissing => serializer.serialize_str(Self::KEY_MISSING),
            FindingValue::ValueMismatch => serializer.serialize_str(Self::VALUE_MISMATCH),
        }
    }
}

impl<'a> ResultSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.mismatches.is_empty()
    }
    pub fn len(&self) -> usize {
        self.matches.len() + self.mismatches.len()
    }
    pub(crate) fn record(&mut self, path: &str, value: FindingValue<'a>) {
        log::debug!("finding {path}: {value:?}");
        let finding = Finding { path: path.to_string(), value };
        if value.is_match() {
            self.matches.push(finding);
        } else {
            self.mismatches.push(finding);
        }
    }
    /// All findings, mismatches first, in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &Finding<'a>> {
        self.mismatches.iter().chain(self.matches.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_routes_by_outcome() {
        let leaf = json!("Alice");
        let mut results = ResultSet::new();
        results.record("/name", FindingValue::Matched(&leaf));
        results.record("/age", FindingValue::KeyMissing);
        results.record("/tags", FindingValue::ValueMismatch);
        assert_eq!(results.matches.len(), 1);
        assert_eq!(results.mismatches.len(), 2);
        assert_eq!(results.len(), 3);
        assert_eq!(results.mismatches[0].path, "/age");
    }

    #[test]
    fn serializes_with_sentinel_codes() {
        let leaf = json!(34);
        let mut results = ResultSet::new();
        results.record("/a", FindingValue::KeyMissing);
        results.record("/b", FindingValue::Matched(&leaf));
        let out = serde_json::to_value(&results).unwrap();
        assert_eq!(
            out,
            json!({
                "mismatches": [{"path": "/a", "value": "JSON_key_not_found"}],
                "matches": [{"path": "/b", "value": 34}],
            })
        );
    }
}
