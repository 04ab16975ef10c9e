//! Structural comparison of JSON documents.
//!
//! Used to check that decoding then encoding a payload gives back an
//! equivalent document. Object key order never matters, numbers compare
//! by value, and two strings that both read as RFC 3339 date-times compare
//! as instants, so `2024-01-01T00:00:00.000Z` equals `2024-01-01T00:00:00Z`.
//! Times of day and ISO 8601 durations compare by value the same way:
//! `08:00:00.0000000` equals `08:00:00` and `PT1H0M` equals `PT1H`.

use std::fmt;

use chrono::{DateTime, NaiveTime};
use serde_json::Value;

use crate::duration::IsoDuration;

/// How a path differs between the two documents.
#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceKind {
    /// Present in the expected document only.
    Missing(Value),
    /// Present in the actual document only.
    Added(Value),
    Changed { expected: Value, actual: Value },
}

/// One difference, located by a JSON pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub path: String,
    pub kind: DifferenceKind,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match &self.kind {
            DifferenceKind::Missing(v) => write!(f, "{path}: missing (expected {v})"),
            DifferenceKind::Added(v) => write!(f, "{path}: added {v}"),
            DifferenceKind::Changed { expected, actual } => {
                write!(f, "{path}: expected {expected}, got {actual}")
            }
        }
    }
}

impl Difference {
    /// Whether the difference drops or alters input data.
    ///
    /// Added values and missing `null`s are not losses: decoding records a
    /// `null` property as absent.
    pub fn is_loss(&self) -> bool {
        match &self.kind {
            DifferenceKind::Missing(Value::Null) | DifferenceKind::Added(_) => false,
            DifferenceKind::Missing(_) | DifferenceKind::Changed { .. } => true,
        }
    }
}

/// Lists every difference between `expected` and `actual`.
pub fn json_diff(expected: &Value, actual: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    walk(String::new(), expected, actual, &mut out);
    out
}

fn walk(path: String, expected: &Value, actual: &Value, out: &mut Vec<Difference>) {
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => {
            for (key, ev) in e {
                let child = pointer(&path, key);
                match a.get(key) {
                    Some(av) => walk(child, ev, av, out),
                    None => out.push(Difference {
                        path: child,
                        kind: DifferenceKind::Missing(ev.clone()),
                    }),
                }
            }
            for (key, av) in a {
                if !e.contains_key(key) {
                    out.push(Difference {
                        path: pointer(&path, key),
                        kind: DifferenceKind::Added(av.clone()),
                    });
                }
            }
        }
        (Value::Array(e), Value::Array(a)) => {
            for (index, ev) in e.iter().enumerate() {
                let child = pointer(&path, &index.to_string());
                match a.get(index) {
                    Some(av) => walk(child, ev, av, out),
                    None => out.push(Difference {
                        path: child,
                        kind: DifferenceKind::Missing(ev.clone()),
                    }),
                }
            }
            for (index, av) in a.iter().enumerate().skip(e.len()) {
                out.push(Difference {
                    path: pointer(&path, &index.to_string()),
                    kind: DifferenceKind::Added(av.clone()),
                });
            }
        }
        (e, a) if scalars_equal(e, a) => {}
        (e, a) => out.push(Difference {
            path,
            kind: DifferenceKind::Changed {
                expected: e.clone(),
                actual: a.clone(),
            },
        }),
    }
}

fn scalars_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(e), Value::Number(a)) => match (e.as_i64(), a.as_i64()) {
            (Some(e), Some(a)) => e == a,
            _ => e.as_f64() == a.as_f64(),
        },
        (Value::String(e), Value::String(a)) if e != a => temporal_equal(e, a),
        (e, a) => e == a,
    }
}

/// Compares two differently spelled strings as instants, times of day or
/// durations, whichever both of them parse as.
fn temporal_equal(expected: &str, actual: &str) -> bool {
    if let (Ok(e), Ok(a)) = (
        DateTime::parse_from_rfc3339(expected),
        DateTime::parse_from_rfc3339(actual),
    ) {
        return e == a;
    }
    if let (Ok(e), Ok(a)) = (
        NaiveTime::parse_from_str(expected, "%H:%M:%S%.f"),
        NaiveTime::parse_from_str(actual, "%H:%M:%S%.f"),
    ) {
        return e == a;
    }
    match (IsoDuration::parse(expected), IsoDuration::parse(actual)) {
        (Ok(e), Ok(a)) => e == a || (e.is_zero() && a.is_zero()),
        _ => false,
    }
}

/// Appends one escaped reference token (RFC 6901).
fn pointer(parent: &str, token: &str) -> String {
    format!("{parent}/{}", token.replace('~', "~0").replace('/', "~1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn equal_documents_have_no_differences() {
        let doc = json!({"a": [1, {"b": null}], "c": "x"});
        assert!(json_diff(&doc, &doc).is_empty());
    }

    #[test]
    fn numbers_and_instants_compare_by_value() {
        let e = json!({"n": 1, "when": "2024-01-01T00:00:00.000Z"});
        let a = json!({"n": 1.0, "when": "2024-01-01T00:00:00Z"});
        assert!(json_diff(&e, &a).is_empty());
    }

    #[test]
    fn times_and_durations_compare_by_value() {
        let e = json!({
            "start": "08:00:00.0000000",
            "grace": "P0D",
            "timeout": "PT1H0M",
            "delay": "PT1.50S"
        });
        let a = json!({"start": "08:00:00", "grace": "PT0S", "timeout": "PT1H", "delay": "PT1.5S"});
        assert!(json_diff(&e, &a).is_empty());

        let diffs = json_diff(
            &json!({"timeout": "PT1H", "start": "08:00:00"}),
            &json!({"timeout": "PT60M", "start": "08:00:01"}),
        );
        let paths: Vec<&str> = diffs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["/start", "/timeout"]);
    }

    #[test]
    fn reports_missing_added_and_changed() {
        let e = json!({"keep": 1, "gone": true, "list": [1, 2], "x/y": "a"});
        let a = json!({"keep": 2, "new": null, "list": [1], "x/y": "a"});
        let diffs = json_diff(&e, &a);
        let rendered: Vec<String> = diffs.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "/gone: missing (expected true)",
                "/keep: expected 1, got 2",
                "/list/1: missing (expected 2)",
                "/new: added null",
            ]
        );
    }

    #[test]
    fn only_dropped_or_altered_data_is_a_loss() {
        let e = json!({"gone": null, "kept": 1, "changed": "a", "lost": [1]});
        let a = json!({"kept": 1, "changed": "b", "@odata.type": "#x"});
        let diffs = json_diff(&e, &a);
        let losses: Vec<&str> = diffs
            .iter()
            .filter(|d| d.is_loss())
            .map(|d| d.path.as_str())
            .collect();
        assert_eq!(losses, vec!["/changed", "/lost"]);
    }

    #[test]
    fn pointer_tokens_are_escaped() {
        let diffs = json_diff(&json!({"a/b~c": 1}), &json!({}));
        assert_eq!(diffs[0].path, "/a~1b~0c");
    }

    #[test]
    fn root_change_has_empty_path() {
        let diffs = json_diff(&json!(1), &json!("1"));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].to_string(), "/: expected 1, got \"1\"");
    }
}
