//! Interpret model replies.
//!
//! Parsing never fails. A reply is first searched for a brace-delimited JSON
//! object (greedy, first `{` to last `}`); if that decodes to an object with
//! at least one expected key the result is [`ParseOutcome::Structured`].
//! Otherwise the raw text is cut into fixed character windows and the result
//! is [`ParseOutcome::Heuristic`]. The heuristic is lossy: it keeps the
//! pipeline moving but says nothing about what the model meant.

use crate::output::{CaseStudyBody, ParseOutcome};
use crate::prompts::CASE_STUDY_KEYS;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Greedy `{ … }` across lines.
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Placeholder metrics used by the heuristic fallback.
pub const PLACEHOLDER_METRICS: [&str; 3] = ["Metric 1", "Metric 2", "Metric 3"];

/// Lessons-learned text used by the heuristic fallback.
pub const PLACEHOLDER_LESSONS: &str = "Key insights from the project implementation";

/// Width of each positional window, in characters.
const WINDOW: usize = 500;

/// Parse a case-study reply.
pub fn parse_case_study(raw: &str) -> ParseOutcome<CaseStudyBody> {
    if let Some(m) = JSON_OBJECT.find(raw) {
        match serde_json::from_str::<Value>(m.as_str()) {
            Ok(Value::Object(map)) if CASE_STUDY_KEYS.iter().any(|k| map.contains_key(*k)) => {
                debug!("Case study decoded from JSON ({} keys)", map.len());
                return ParseOutcome::Structured(body_from_map(&map));
            }
            Ok(_) => warn!("Reply JSON has none of the case-study keys, slicing raw text"),
            Err(e) => warn!("Reply JSON did not decode ({}), slicing raw text", e),
        }
    } else {
        warn!("Reply contains no JSON object, slicing raw text");
    }
    ParseOutcome::Heuristic(sliced_body(raw))
}

/// Parse a summary reply: trimmed text, or an empty heuristic result.
pub fn parse_summary(raw: &str) -> ParseOutcome<String> {
    let summary = raw.trim();
    if summary.is_empty() {
        warn!("Summary reply was empty");
        ParseOutcome::Heuristic(String::new())
    } else {
        ParseOutcome::Structured(summary.to_string())
    }
}

fn body_from_map(map: &Map<String, Value>) -> CaseStudyBody {
    let text = |key: &str| map.get(key).map(value_text).unwrap_or_default();
    CaseStudyBody {
        problem_statement: text("problem_statement"),
        solution_approach: text("solution_approach"),
        key_metrics: map.get("key_metrics").map(value_list).unwrap_or_default(),
        impact_summary: text("impact_summary"),
        implementation_details: text("implementation_details"),
        lessons_learned: text("lessons_learned"),
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}

fn value_list(v: &Value) -> Vec<String> {
    match v {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(value_text).collect(),
        other => vec![value_text(other)],
    }
}

fn sliced_body(raw: &str) -> CaseStudyBody {
    let window = |n: usize| raw.chars().skip(n * WINDOW).take(WINDOW).collect::<String>();
    CaseStudyBody {
        problem_statement: window(0),
        solution_approach: window(1),
        key_metrics: PLACEHOLDER_METRICS.iter().map(|m| m.to_string()).collect(),
        impact_summary: window(2),
        implementation_details: window(3),
        lessons_learned: PLACEHOLDER_LESSONS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{"problem_statement":"x","solution_approach":"y","key_metrics":["m1"],"impact_summary":"z","implementation_details":"w","lessons_learned":"v"}"#;

    #[test]
    fn embedded_object_is_extracted() {
        let raw = format!("Sure! Here is the case study:\n```json\n{REPLY}\n```\nHope it helps.");
        let outcome = parse_case_study(&raw);
        assert!(outcome.is_structured());
        assert_eq!(
            outcome.into_inner(),
            CaseStudyBody {
                problem_statement: "x".into(),
                solution_approach: "y".into(),
                key_metrics: vec!["m1".into()],
                impact_summary: "z".into(),
                implementation_details: "w".into(),
                lessons_learned: "v".into(),
            }
        );
    }

    #[test]
    fn plain_text_is_sliced_into_windows() {
        let raw: String = ('a'..='e').flat_map(|c| std::iter::repeat(c).take(500)).collect();
        assert_eq!(raw.len(), 2500);
        let outcome = parse_case_study(&raw);
        assert!(!outcome.is_structured());
        let body = outcome.into_inner();
        assert_eq!(body.problem_statement, "a".repeat(500));
        assert_eq!(body.solution_approach, "b".repeat(500));
        assert_eq!(body.impact_summary, "c".repeat(500));
        assert_eq!(body.implementation_details, "d".repeat(500));
        assert_eq!(body.key_metrics, vec!["Metric 1", "Metric 2", "Metric 3"]);
        assert_eq!(body.lessons_learned, PLACEHOLDER_LESSONS);
    }

    #[test]
    fn broken_json_falls_back() {
        let outcome = parse_case_study("{\"problem_statement\": \"unterminated");
        assert!(!outcome.is_structured());
        assert_eq!(
            outcome.as_inner().problem_statement,
            "{\"problem_statement\": \"unterminated"
        );
    }

    #[test]
    fn short_text_leaves_later_windows_empty() {
        let body = parse_case_study("Q1 revenue grew 20%.").into_inner();
        assert_eq!(body.problem_statement, "Q1 revenue grew 20%.");
        assert_eq!(body.solution_approach, "");
        assert_eq!(body.implementation_details, "");
    }

    #[test]
    fn windows_count_characters() {
        let raw = "é".repeat(600);
        let body = parse_case_study(&raw).into_inner();
        assert_eq!(body.problem_statement.chars().count(), 500);
        assert_eq!(body.solution_approach.chars().count(), 100);
    }

    #[test]
    fn missing_keys_filled_and_metric_string_accepted() {
        let body = parse_case_study(r#"{"problem_statement":"p","key_metrics":"20% growth","impact_summary":42}"#)
            .into_inner();
        assert_eq!(body.problem_statement, "p");
        assert_eq!(body.key_metrics, vec!["20% growth"]);
        assert_eq!(body.impact_summary, "42");
        assert_eq!(body.lessons_learned, "");
    }

    #[test]
    fn unrelated_object_is_heuristic() {
        assert!(!parse_case_study(r#"{"answer": 1}"#).is_structured());
    }

    #[test]
    fn summary_is_trimmed() {
        assert_eq!(
            parse_summary("\n  - point one\n- point two  \n"),
            ParseOutcome::Structured("- point one\n- point two".to_string())
        );
        assert_eq!(parse_summary("   "), ParseOutcome::Heuristic(String::new()));
    }
}
