use serde::Serialize;

use crate::finding::ResultSet;

/// Aggregate classification of one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    #[serde(rename = "AND_match")]
    AllMatch,
    #[serde(rename = "AND_mismatch")]
    AllMismatch,
    #[serde(rename = "OR_match_mismatch")]
    MixedMatchMismatch,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::AllMatch => "AND_match",
            Verdict::AllMismatch => "AND_mismatch",
            Verdict::MixedMatchMismatch => "OR_match_mismatch",
        }
    }
    /// True when at least one leaf matched.
    pub fn has_matches(&self) -> bool {
        matches!(self, Verdict::AllMatch | Verdict::MixedMatchMismatch)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce a result set to its verdict; `None` when nothing was recorded.
pub fn overall_result(results: &ResultSet<'_>) -> Option<Verdict> {
    let has_matches = !results.matches.is_empty();
    let has_mismatches = !results.mismatches.is_empty();
    match (has_matches, has_mismatches) {
        (false, false) => None,
        (true, false) => Some(Verdict::AllMatch),
        (false, true) => Some(Verdict::AllMismatch),
        (true, true) => Some(Verdict::MixedMatchMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingValue;
    use serde_json::json;

    fn result_set<'a>(leaf: &'a serde_json::Value, matches: usize, mismatches: usize) -> ResultSet<'a> {
        let mut results = ResultSet::new();
        for i in 0..matches {
            results.record(&format!("/m{i}"), FindingValue::Matched(leaf));
        }
        for i in 0..mismatches {
            results.record(&format!("/x{i}"), FindingValue::ValueMismatch);
        }
        results
    }

    #[test]
    fn decision_table_is_exhaustive() {
        let leaf = json!("v");
        assert_eq!(overall_result(&result_set(&leaf, 0, 0)), None);
        assert_eq!(overall_result(&result_set(&leaf, 2, 0)), Some(Verdict::AllMatch));
        assert_eq!(overall_result(&result_set(&leaf, 0, 3)), Some(Verdict::AllMismatch));
        assert_eq!(overall_result(&result_set(&leaf, 1, 1)), Some(Verdict::MixedMatchMismatch));
    }

    #[test]
    fn serialized_names() {
        assert_eq!(serde_json::to_value(Verdict::AllMatch).unwrap(), json!("AND_match"));
        assert_eq!(Verdict::MixedMatchMismatch.to_string(), "OR_match_mismatch");
        assert!(!Verdict::AllMismatch.has_matches());
    }
}
