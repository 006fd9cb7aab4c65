//! Replays canned clause/document scenarios and prints what the matcher
//! decided next to what was expected.
use colored::Colorize;
use json_clause::{Matcher, Verdict};
use serde_json::{json, Value};

struct Scenario {
    name: &'static str,
    clause: Value,
    document: Value,
    expected: Option<Verdict>,
}

fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "person: full match",
            clause: json!({"name": "^Al.*$", "age": "^3[0-9]$"}),
            document: json!({"name": "Alice", "age": "34"}),
            expected: Some(Verdict::AllMatch),
        },
        Scenario {
            name: "person: partial match",
            clause: json!({"name": "^Al.*$", "age": "^3[0-9]$"}),
            document: json!({"name": "Bob", "age": "34"}),
            expected: Some(Verdict::MixedMatchMismatch),
        },
        Scenario {
            name: "nested key missing",
            clause: json!({"a": {"b": "^1$"}}),
            document: json!({}),
            expected: Some(Verdict::AllMismatch),
        },
        Scenario {
            name: "sequence shorthand reads first element",
            clause: json!({"items": [{"id": "^42$"}]}),
            document: json!({"items": [{"id": "42"}, {"id": "99"}]}),
            expected: Some(Verdict::AllMatch),
        },
        Scenario {
            name: "array where a leaf is expected",
            clause: json!({"tags": "^x"}),
            document: json!({"tags": ["x"]}),
            expected: Some(Verdict::AllMismatch),
        },
        Scenario {
            name: "empty clause",
            clause: json!({}),
            document: json!({"anything": true}),
            expected: None,
        },
    ]
}

fn main() {
    let mut failed = 0usize;
    for scenario in scenarios() {
        let outcome = Matcher::new(&scenario.clause)
            .map_err(|error| error.to_string())
            .and_then(|matcher| matcher.compare(&scenario.document).map_err(|error| error.to_string()));
        match outcome {
            Ok(verdict) if verdict == scenario.expected => {
                eprintln!("{} {} ({verdict:?})", "✅".green(), scenario.name);
            }
            Ok(verdict) => {
                failed += 1;
                eprintln!(
                    "{} {}: expected {:?}, got {verdict:?}",
                    "❌".red(),
                    scenario.name,
                    scenario.expected
                );
            }
            Err(error) => {
                failed += 1;
                eprintln!("{} {}: {error}", "❌".red(), scenario.name);
            }
        }
    }
    if failed > 0 {
        std::process::exit(1);
    }
}
