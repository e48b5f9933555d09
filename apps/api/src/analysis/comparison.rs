//! Resume-vs-job comparison records.
//!
//! [`CandidateComparison`] is what the model claimed, coerced totally from its
//! raw JSON object. [`ComparisonResult`] is the reconciled record handed to
//! clients; every skill in it is grounded in the job description.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::extraction::schema::scalar_text;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub keyword: String,
    pub section: String,
    pub suggestion: String,
}

const DEFAULT_SUGGESTION_SECTION: &str = "Skills";

/// The model's comparison after total coercion. Scores are `None` when the
/// model omitted them or sent something that is not a number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateComparison {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extracted_keywords: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub match_percentage: Option<f64>,
    pub overall_score: Option<f64>,
    pub skills_match: Option<f64>,
    pub keyword_match: Option<f64>,
    pub experience_match: Option<f64>,
    pub ats_score: Option<f64>,
    pub explanation: Option<String>,
    pub error: Option<String>,
}

impl CandidateComparison {
    /// Never fails; malformed fields fall back to empty lists or `None`.
    pub fn from_model(source: &Map<String, Value>) -> Self {
        Self {
            matched_skills: string_list(source.get("matchedSkills")),
            missing_skills: string_list(source.get("missingSkills")),
            extracted_keywords: string_list(source.get("extractedKeywords")),
            suggestions: suggestions(source.get("suggestions")),
            match_percentage: score(source.get("matchPercentage")),
            overall_score: score(source.get("overallScore")),
            skills_match: score(source.get("skillsMatch")),
            keyword_match: score(source.get("keywordMatch")),
            experience_match: score(source.get("experienceMatch")),
            ats_score: score(source.get("atsScore")),
            explanation: source.get("explanation").and_then(scalar_text),
            error: source.get("error").and_then(scalar_text),
        }
    }

    /// Coerces a client-supplied value; anything but an object yields an empty comparison.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_model(map),
            _ => Self::default(),
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Accepts numbers and numeric strings such as `"85"` or `"85%"`.
fn score(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn suggestions(value: Option<&Value>) -> Vec<Suggestion> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let keyword = obj.get("keyword").and_then(scalar_text)?;
            let section = obj
                .get("section")
                .and_then(scalar_text)
                .unwrap_or_else(|| DEFAULT_SUGGESTION_SECTION.to_string());
            let suggestion = obj
                .get("suggestion")
                .and_then(scalar_text)
                .unwrap_or_else(|| format!("Mention {keyword} where it reflects your experience"));
            Some(Suggestion {
                keyword,
                section,
                suggestion,
            })
        })
        .collect()
}

/// Reconciled comparison. Component scores lie in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub match_percentage: u8,
    pub overall_score: u8,
    pub skills_match: f64,
    pub keyword_match: f64,
    pub experience_match: f64,
    pub ats_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extracted_keywords: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub explanation: String,
    /// Skills the model reported that do not occur in the job description.
    pub invalid_keywords: Vec<String>,
    pub validation_rate: f64,
}

/// Either a reconciled analysis or the model's refusal (e.g. the job
/// description was too short). A refusal carries no scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Rejected { error: String },
    Analysis(ComparisonResult),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce(value: Value) -> CandidateComparison {
        CandidateComparison::from_value(&value)
    }

    #[test]
    fn test_empty_object_coerces_to_defaults() {
        assert_eq!(coerce(json!({})), CandidateComparison::default());
        assert_eq!(coerce(json!("not an object")), CandidateComparison::default());
    }

    #[test]
    fn test_scores_accept_numeric_strings() {
        let c = coerce(json!({
            "skillsMatch": "85%",
            "keywordMatch": 70,
            "experienceMatch": "n/a",
            "atsScore": true
        }));
        assert_eq!(c.skills_match, Some(85.0));
        assert_eq!(c.keyword_match, Some(70.0));
        assert_eq!(c.experience_match, None);
        assert_eq!(c.ats_score, None);
    }

    #[test]
    fn test_skill_lists_tolerate_bad_items() {
        let c = coerce(json!({
            "matchedSkills": ["Python", null, "", {"x": 1}, 42],
            "missingSkills": "Kubernetes, GraphQL"
        }));
        assert_eq!(c.matched_skills, vec!["Python", "42"]);
        assert_eq!(c.missing_skills, vec!["Kubernetes", "GraphQL"]);
    }

    #[test]
    fn test_null_error_is_absent() {
        assert_eq!(coerce(json!({"error": null})).error, None);
        assert_eq!(
            coerce(json!({"error": "Job description is missing"})).error.as_deref(),
            Some("Job description is missing")
        );
    }

    #[test]
    fn test_suggestions_need_a_keyword() {
        let c = coerce(json!({
            "suggestions": [
                {"keyword": "Docker", "section": "Experience", "suggestion": "Mention containers"},
                {"keyword": "Go"},
                {"section": "Skills"},
                "loose string"
            ]
        }));
        assert_eq!(c.suggestions.len(), 2);
        assert_eq!(c.suggestions[0].section, "Experience");
        assert_eq!(c.suggestions[1].section, DEFAULT_SUGGESTION_SECTION);
    }

    #[test]
    fn test_rejected_outcome_serializes_error_only() {
        let out = ComparisonOutcome::Rejected {
            error: "too short".to_string(),
        };
        assert_eq!(serde_json::to_value(out).unwrap(), json!({"error": "too short"}));
    }
}
