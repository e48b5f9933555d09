//! Skill reconciliation: keeps only skills that literally occur in the job
//! description and recomputes the weighted score.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::comparison::{
    CandidateComparison, ComparisonOutcome, ComparisonResult, Suggestion,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub keywords: f64,
    pub experience: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            keywords: 0.3,
            experience: 0.3,
        }
    }
}

/// Weighted overall score: 0.4*skills + 0.3*keywords + 0.3*experience, rounded.
pub fn compute_overall_score(
    skills_match: f64,
    keyword_match: f64,
    experience_match: f64,
    weights: &ScoringWeights,
) -> u8 {
    let weighted = weights.skills * clamp_score(skills_match)
        + weights.keywords * clamp_score(keyword_match)
        + weights.experience * clamp_score(experience_match);
    weighted.round().clamp(0.0, 100.0) as u8
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grounding
// ────────────────────────────────────────────────────────────────────────────

/// Surface forms tried against the job description: as written, without
/// whitespace, without `.`/`-`, plus one `s`, minus one trailing `s`.
pub fn skill_variants(skill: &str) -> Vec<String> {
    let lower = skill.to_lowercase();
    let mut variants = vec![
        lower.clone(),
        lower.chars().filter(|c| !c.is_whitespace()).collect(),
        lower.chars().filter(|c| *c != '.' && *c != '-').collect(),
        format!("{lower}s"),
        lower.strip_suffix('s').unwrap_or(&lower).to_string(),
    ];
    variants.retain(|v| !v.is_empty());
    variants.dedup();
    variants
}

/// `job_description_lower` must already be lower-cased.
pub fn is_grounded(skill: &str, job_description_lower: &str) -> bool {
    skill_variants(skill)
        .iter()
        .any(|variant| job_description_lower.contains(variant.as_str()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordValidation {
    pub valid_keywords: Vec<String>,
    pub invalid_keywords: Vec<String>,
    pub validation_rate: f64,
}

pub fn validate_keywords(keywords: &[String], job_description: &str) -> KeywordValidation {
    let jd_lower = job_description.to_lowercase();
    let (valid_keywords, invalid_keywords): (Vec<String>, Vec<String>) = keywords
        .iter()
        .cloned()
        .partition(|keyword| is_grounded(keyword, &jd_lower));
    let validation_rate = if keywords.is_empty() {
        100.0
    } else {
        100.0 * valid_keywords.len() as f64 / keywords.len() as f64
    };
    KeywordValidation {
        valid_keywords,
        invalid_keywords,
        validation_rate,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ────────────────────────────────────────────────────────────────────────────

/// Validates a model comparison against the job description.
///
/// A model-reported `error` is terminal and returned as-is. Otherwise skill
/// lists are trimmed and de-duplicated case-insensitively (a skill listed as
/// both matched and missing stays matched), ungrounded skills are moved to
/// `invalid_keywords`, and scores are clamped and re-weighted. Component
/// scores the model omitted are derived from the grounded lists; a missing
/// experience score counts as 0.
pub fn reconcile(
    job_description: &str,
    candidate: CandidateComparison,
    weights: &ScoringWeights,
) -> ComparisonOutcome {
    if let Some(error) = candidate.error {
        info!("Model declined the comparison: {error}");
        return ComparisonOutcome::Rejected { error };
    }

    let mut seen = HashSet::new();
    let matched = dedup_skills(&candidate.matched_skills, &mut seen);
    let missing = dedup_skills(&candidate.missing_skills, &mut seen);
    let matched_count = matched.len();

    let claimed: Vec<String> = matched.into_iter().chain(missing).collect();
    let validation = validate_keywords(&claimed, job_description);
    let jd_lower = job_description.to_lowercase();

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = {
        let mut matched_skills = Vec::new();
        let mut missing_skills = Vec::new();
        for (index, skill) in claimed.iter().enumerate() {
            if !is_grounded(skill, &jd_lower) {
                continue;
            }
            if index < matched_count {
                matched_skills.push(skill.clone());
            } else {
                missing_skills.push(skill.clone());
            }
        }
        (matched_skills, missing_skills)
    };

    let extracted_keywords =
        grounded_keywords(&candidate.extracted_keywords, &matched_skills, &missing_skills, &jd_lower);
    let suggestions = suggestions_for(&candidate.suggestions, &missing_skills);

    let skills_match = candidate
        .skills_match
        .map(clamp_score)
        .unwrap_or_else(|| percentage(matched_skills.len(), matched_skills.len() + missing_skills.len()));
    let keyword_match = candidate
        .keyword_match
        .map(clamp_score)
        .unwrap_or_else(|| percentage(matched_skills.len(), extracted_keywords.len()));
    let experience_match = candidate.experience_match.map(clamp_score).unwrap_or(0.0);
    let overall_score = compute_overall_score(skills_match, keyword_match, experience_match, weights);
    let ats_score = candidate
        .ats_score
        .map(clamp_score)
        .unwrap_or(f64::from(overall_score));

    if let Some(claimed_overall) = candidate.overall_score.or(candidate.match_percentage) {
        debug!("Model overall score {claimed_overall} recomputed as {overall_score}");
    }
    if !validation.invalid_keywords.is_empty() {
        debug!(
            "Dropped {} ungrounded skill(s): {:?}",
            validation.invalid_keywords.len(),
            validation.invalid_keywords
        );
    }

    ComparisonOutcome::Analysis(ComparisonResult {
        match_percentage: overall_score,
        overall_score,
        skills_match,
        keyword_match,
        experience_match,
        ats_score,
        matched_skills,
        missing_skills,
        extracted_keywords,
        suggestions,
        explanation: candidate.explanation.unwrap_or_default(),
        invalid_keywords: validation.invalid_keywords,
        validation_rate: validation.validation_rate,
    })
}

/// Trimmed, non-blank skills not already in `seen` (compared case-insensitively).
fn dedup_skills(skills: &[String], seen: &mut HashSet<String>) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Grounded extracted keywords, followed by any grounded skill the model forgot to list.
fn grounded_keywords(
    extracted: &[String],
    matched: &[String],
    missing: &[String],
    jd_lower: &str,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = dedup_skills(extracted, &mut seen);
    keywords.retain(|k| is_grounded(k, jd_lower));
    keywords.extend(dedup_skills(matched, &mut seen));
    keywords.extend(dedup_skills(missing, &mut seen));
    keywords
}

fn suggestions_for(suggestions: &[Suggestion], missing: &[String]) -> Vec<Suggestion> {
    let wanted: HashSet<String> = missing.iter().map(|s| s.to_lowercase()).collect();
    suggestions
        .iter()
        .filter(|s| wanted.contains(&s.keyword.trim().to_lowercase()))
        .cloned()
        .collect()
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
