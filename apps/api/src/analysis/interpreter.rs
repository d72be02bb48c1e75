//! Response Interpreter — turns free-form model output into an `AnalysisResult`.
//!
//! The model is asked for JSON only, but routinely wraps it in commentary.
//! Extraction takes everything from the first `{` to the last `}` and nothing
//! more: no fence stripping, no comma repair, no second attempt. A candidate
//! that survives parsing is then checked against the analysis schema, and the
//! parsed object itself (not a re-serialization of the typed record) is what
//! callers relay.
//!
//! Pure over its input; callers own logging and any re-prompting.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::analysis::model::{AnalysisResult, ExperienceCategory};

const SCORE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;
const STAR_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
const EXPERIENCE_SCORE_RANGE: std::ops::RangeInclusive<u32> = 1..=100;
const SUGGESTION_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("model output contains no JSON object")]
    MalformedOutput,

    #[error("extraction candidate is not valid JSON: {source}")]
    InvalidJson {
        candidate: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model JSON does not match the analysis schema: {}", .violations.join("; "))]
    SchemaViolation { violations: Vec<String> },
}

impl InterpretError {
    fn violation(message: impl Into<String>) -> Self {
        InterpretError::SchemaViolation {
            violations: vec![message.into()],
        }
    }
}

/// Returns the slice from the first `{` through the last `}` inclusive.
pub fn extract_candidate(raw: &str) -> Result<&str, InterpretError> {
    let first = raw.find('{').ok_or(InterpretError::MalformedOutput)?;
    let last = raw.rfind('}').ok_or(InterpretError::MalformedOutput)?;
    if first >= last {
        return Err(InterpretError::MalformedOutput);
    }
    // Both braces are single-byte, so these are char boundaries.
    Ok(&raw[first..=last])
}

/// A model object that passed schema validation.
#[derive(Debug, Clone)]
pub struct ValidatedAnalysis {
    /// Typed view used for checks and logging.
    pub result: AnalysisResult,
    /// The object exactly as the model emitted it, extra keys and integer
    /// scores included.
    pub json: Value,
}

/// Extracts, parses and validates an analysis from raw model output.
pub fn interpret(raw: &str) -> Result<ValidatedAnalysis, InterpretError> {
    let candidate = extract_candidate(raw)?;

    let value: Value =
        serde_json::from_str(candidate).map_err(|source| InterpretError::InvalidJson {
            candidate: candidate.to_string(),
            source,
        })?;

    let result = AnalysisResult::deserialize(&value)
        .map_err(|e| InterpretError::violation(e.to_string()))?;

    let violations = check_schema(&result);
    if !violations.is_empty() {
        return Err(InterpretError::SchemaViolation { violations });
    }

    Ok(ValidatedAnalysis {
        result,
        json: value,
    })
}

/// Collects every range, cardinality and format violation in `result`.
/// Key presence and types are already enforced by deserialization.
fn check_schema(result: &AnalysisResult) -> Vec<String> {
    let mut violations = Vec::new();

    let overall = &result.overall;
    if !SCORE_RANGE.contains(&overall.score) {
        violations.push(format!(
            "overall.score {} outside 1.0-10.0",
            overall.score
        ));
    }
    if !STAR_RANGE.contains(&overall.stars) {
        violations.push(format!("overall.stars {} outside 1-5", overall.stars));
    }
    if overall.summary.trim().is_empty() {
        violations.push("overall.summary is empty".to_string());
    }

    for (name, score) in result.ratings.named() {
        if !SCORE_RANGE.contains(&score) {
            violations.push(format!("ratings.{name} {score} outside 1.0-10.0"));
        }
    }

    for (i, skill) in result.skills_analysis.iter().enumerate() {
        if skill.name.trim().is_empty() {
            violations.push(format!("skills_analysis[{i}].name is empty"));
        }
        if !is_hex_color(&skill.color) {
            violations.push(format!(
                "skills_analysis[{i}].color {:?} is not #RRGGBB",
                skill.color
            ));
        }
        if skill.value > 100 {
            violations.push(format!(
                "skills_analysis[{i}].value {} exceeds 100",
                skill.value
            ));
        }
    }

    let experience = &result.experience_analysis;
    if experience.len() != ExperienceCategory::ALL.len() {
        violations.push(format!(
            "experience_analysis has {} entries, expected {}",
            experience.len(),
            ExperienceCategory::ALL.len()
        ));
    }
    let mut seen = HashSet::new();
    for (i, entry) in experience.iter().enumerate() {
        if !seen.insert(entry.category) {
            violations.push(format!(
                "experience_analysis[{i}].category {:?} is repeated",
                entry.category
            ));
        }
        if !EXPERIENCE_SCORE_RANGE.contains(&entry.score) {
            violations.push(format!(
                "experience_analysis[{i}].score {} outside 1-100",
                entry.score
            ));
        }
    }

    for (field, items) in [
        ("strengths", &result.suggestions.strengths),
        ("improvements", &result.suggestions.improvements),
    ] {
        if items.len() != SUGGESTION_COUNT {
            violations.push(format!(
                "suggestions.{field} has {} items, expected {SUGGESTION_COUNT}",
                items.len()
            ));
        }
        if items.iter().any(|s| s.trim().is_empty()) {
            violations.push(format!("suggestions.{field} contains an empty item"));
        }
    }

    violations
}

fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#')
        .map(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::sample_analysis;
    use crate::analysis::model::RatingText;
    use serde_json::json;

    fn violations_of(err: InterpretError) -> Vec<String> {
        match err {
            InterpretError::SchemaViolation { violations } => violations,
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_candidate_strips_commentary() {
        let raw = "Sure! Here you go: {\"a\": {\"b\": 1}} Let me know.";
        assert_eq!(extract_candidate(raw).unwrap(), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn test_extract_candidate_without_open_brace() {
        assert!(matches!(
            extract_candidate("no json here }"),
            Err(InterpretError::MalformedOutput)
        ));
    }

    #[test]
    fn test_extract_candidate_without_close_brace() {
        assert!(matches!(
            extract_candidate("{ never closed"),
            Err(InterpretError::MalformedOutput)
        ));
    }

    #[test]
    fn test_extract_candidate_close_before_open() {
        assert!(matches!(
            extract_candidate("} backwards {"),
            Err(InterpretError::MalformedOutput)
        ));
    }

    #[test]
    fn test_extract_candidate_empty_input() {
        assert!(matches!(
            extract_candidate(""),
            Err(InterpretError::MalformedOutput)
        ));
    }

    #[test]
    fn test_extract_candidate_handles_multibyte_commentary() {
        let raw = "Résumé évalué → {\"ok\": true} ✓";
        assert_eq!(extract_candidate(raw).unwrap(), "{\"ok\": true}");
    }

    #[test]
    fn test_interpret_embedded_object() {
        let expected = sample_analysis();
        let raw = format!("Here is the result: {expected} Thanks!");
        let analysis = interpret(&raw).unwrap();
        assert_eq!(analysis.json, expected);
        assert_eq!(analysis.result.overall.rating_text, RatingText::AboveAverage);
        assert_eq!(analysis.result.skills_total(), 100);
    }

    #[test]
    fn test_interpret_keeps_model_object_verbatim() {
        let mut value = sample_analysis();
        value["overall"]["score"] = json!(8);
        value["overall"]["rating_text"] = json!("AboveAverage");
        value["overall"]["confidence"] = json!("high");
        value["ratings"]["clarity_formatting"] = json!(9);
        let analysis = interpret(&format!("Result: {value}")).unwrap();
        assert_eq!(analysis.json, value);
        assert_eq!(analysis.json["overall"]["score"], json!(8));
        assert_eq!(analysis.result.overall.score, 8.0);
    }

    #[test]
    fn test_interpret_markdown_fenced_output() {
        let raw = format!("```json\n{}\n```", sample_analysis());
        assert!(interpret(&raw).is_ok());
    }

    #[test]
    fn test_interpret_apology_is_malformed() {
        assert!(matches!(
            interpret("Sorry, I cannot process this."),
            Err(InterpretError::MalformedOutput)
        ));
    }

    #[test]
    fn test_interpret_unbalanced_quote_is_invalid_json() {
        let raw = r#"Result: {"overall": {"summary": "oops}} done"#;
        match interpret(raw) {
            Err(InterpretError::InvalidJson { candidate, .. }) => {
                assert_eq!(candidate, r#"{"overall": {"summary": "oops}}"#);
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[test]
    fn test_interpret_trailing_comma_is_invalid_json() {
        let raw = r#"{"experience_analysis": [{"category": "Impact", "score": 70,},]}"#;
        assert!(matches!(
            interpret(raw),
            Err(InterpretError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_interpret_two_objects_is_invalid_json() {
        // The span covers both blocks and the prose between them.
        let raw = r#"{"a": 1} and also {"b": 2}"#;
        assert!(matches!(
            interpret(raw),
            Err(InterpretError::InvalidJson { .. })
        ));
    }

    #[test]
    fn test_interpret_missing_overall_score() {
        let mut value = sample_analysis();
        value["overall"].as_object_mut().unwrap().remove("score");
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations[0].contains("score"), "{violations:?}");
    }

    #[test]
    fn test_interpret_unknown_rating_text() {
        let mut value = sample_analysis();
        value["overall"]["rating_text"] = json!("Superb");
        violations_of(interpret(&value.to_string()).unwrap_err());
    }

    #[test]
    fn test_interpret_accepts_unspaced_rating_alias() {
        let mut value = sample_analysis();
        value["overall"]["rating_text"] = json!("BelowAverage");
        let analysis = interpret(&value.to_string()).unwrap();
        assert_eq!(analysis.result.overall.rating_text, RatingText::BelowAverage);
    }

    #[test]
    fn test_interpret_score_out_of_range() {
        let mut value = sample_analysis();
        value["overall"]["score"] = json!(11.2);
        value["ratings"]["skills_relevance"] = json!(0.5);
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert_eq!(violations.len(), 2, "{violations:?}");
        assert!(violations.iter().any(|v| v.starts_with("overall.score")));
        assert!(violations
            .iter()
            .any(|v| v.starts_with("ratings.skills_relevance")));
    }

    #[test]
    fn test_interpret_stars_out_of_range() {
        let mut value = sample_analysis();
        value["overall"]["stars"] = json!(0);
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations[0].starts_with("overall.stars"));
    }

    #[test]
    fn test_interpret_wrong_experience_count() {
        let mut value = sample_analysis();
        value["experience_analysis"].as_array_mut().unwrap().pop();
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations[0].contains("expected 4"));
    }

    #[test]
    fn test_interpret_repeated_experience_category() {
        let mut value = sample_analysis();
        value["experience_analysis"][3]["category"] = json!("Impact");
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations.iter().any(|v| v.contains("repeated")));
    }

    #[test]
    fn test_interpret_experience_score_out_of_range() {
        let mut value = sample_analysis();
        value["experience_analysis"][0]["score"] = json!(150);
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations[0].contains("outside 1-100"));
    }

    #[test]
    fn test_interpret_bad_skill_color() {
        let mut value = sample_analysis();
        value["skills_analysis"][1]["color"] = json!("blue");
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations[0].contains("#RRGGBB"));
    }

    #[test]
    fn test_interpret_wrong_suggestion_count() {
        let mut value = sample_analysis();
        value["suggestions"]["strengths"]
            .as_array_mut()
            .unwrap()
            .push(json!("A fourth strength."));
        let violations = violations_of(interpret(&value.to_string()).unwrap_err());
        assert!(violations[0].starts_with("suggestions.strengths"));
    }

    #[test]
    fn test_interpret_skill_total_drift_is_not_rejected() {
        let mut value = sample_analysis();
        value["skills_analysis"][0]["value"] = json!(55);
        let analysis = interpret(&value.to_string()).unwrap();
        assert_ne!(analysis.result.skills_total(), 100);
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#1a2B3c"));
        assert!(!is_hex_color("1a2b3c"));
        assert!(!is_hex_color("#1a2b3"));
        assert!(!is_hex_color("#gggggg"));
    }
}
