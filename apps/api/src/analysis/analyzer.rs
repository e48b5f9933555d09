//! Analyze and optimize pipelines: prompt → generator → recovery → reconciliation.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::analysis::comparison::{CandidateComparison, ComparisonOutcome};
use crate::analysis::incorporation::{verify_incorporation, IncorporationReport};
use crate::analysis::prompts::{build_comparison_prompt, build_optimization_prompt};
use crate::analysis::reconcile::{reconcile, ScoringWeights};
use crate::errors::AppError;
use crate::llm_client::{generate_json, TextGenerator};

/// Optimization needs at least this much job description text to work with.
pub const MIN_OPTIMIZE_JOB_DESCRIPTION_CHARS: usize = 50;

pub async fn analyze_resume(
    resume: &str,
    job_description: &str,
    generator: &dyn TextGenerator,
) -> Result<ComparisonOutcome, AppError> {
    require_text(resume, "Resume text")?;
    require_text(job_description, "Job description")?;

    let prompt = build_comparison_prompt(resume, job_description);
    let raw: Map<String, Value> = generate_json(generator, &prompt)
        .await
        .map_err(|e| AppError::from_llm("analysis", e))?;

    let candidate = CandidateComparison::from_model(&raw);
    let outcome = reconcile(job_description, candidate, &ScoringWeights::default());
    if let ComparisonOutcome::Analysis(result) = &outcome {
        info!(
            "Resume analysis: overall={} matched={} missing={} invalid={}",
            result.overall_score,
            result.matched_skills.len(),
            result.missing_skills.len(),
            result.invalid_keywords.len()
        );
    }
    Ok(outcome)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedResume {
    pub optimized_resume: String,
    pub incorporation: IncorporationReport,
}

pub async fn optimize_resume(
    resume: &str,
    job_description: &str,
    comparison: &CandidateComparison,
    generator: &dyn TextGenerator,
) -> Result<OptimizedResume, AppError> {
    require_text(resume, "Resume text")?;
    if job_description.trim().chars().count() < MIN_OPTIMIZE_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "Job description must be at least {MIN_OPTIMIZE_JOB_DESCRIPTION_CHARS} characters"
        )));
    }

    let prompt = build_optimization_prompt(
        resume,
        job_description,
        &comparison.matched_skills,
        &comparison.missing_skills,
    );
    let optimized = generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::from_llm("optimized resume", e))?;
    let optimized = optimized.trim();
    if optimized.is_empty() {
        return Err(AppError::Llm(
            "Failed to generate optimized resume: empty response".to_string(),
        ));
    }

    let incorporation = verify_incorporation(&comparison.missing_skills, optimized);
    info!(
        "Optimized resume: {}/{} missing skill(s) incorporated",
        incorporation.incorporated_skills.len(),
        incorporation.incorporated_skills.len() + incorporation.remaining_missing_skills.len()
    );

    Ok(OptimizedResume {
        optimized_resume: optimized.to_string(),
        incorporation,
    })
}

fn require_text(text: &str, what: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        Err(AppError::Validation(format!("{what} is required")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::CannedGenerator;

    const JD: &str = "We are hiring a backend engineer with Python, Kubernetes and GraphQL \
        experience to build data services for our growing platform team.";

    #[tokio::test]
    async fn test_analysis_drops_ungrounded_skills() {
        let generator = CannedGenerator::new([r#"```json
{"matchedSkills": ["Python", "communication"], "missingSkills": ["Kubernetes"],
 "skillsMatch": 50, "keywordMatch": 50, "experienceMatch": 80, "error": null}
```"#]);
        let outcome = analyze_resume("Python developer", JD, &generator)
            .await
            .unwrap();
        let ComparisonOutcome::Analysis(result) = outcome else {
            panic!("expected an analysis");
        };
        assert_eq!(result.matched_skills, vec!["Python"]);
        assert_eq!(result.invalid_keywords, vec!["communication"]);
        assert_eq!(result.overall_score, 59);
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Python developer"));
    }

    #[tokio::test]
    async fn test_model_refusal_is_returned_as_rejection() {
        let generator = CannedGenerator::new([
            r#"{"error": "Job description is missing or insufficient for meaningful ATS analysis."}"#,
        ]);
        let outcome = analyze_resume("resume", "short jd", &generator)
            .await
            .unwrap();
        assert!(matches!(outcome, ComparisonOutcome::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_analysis_is_unprocessable() {
        let generator = CannedGenerator::new(["I cannot do that"]);
        let err = analyze_resume("resume", JD, &generator).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_truncated_analysis_is_unprocessable() {
        let generator = CannedGenerator::new([r#"{"matchedSkills": ["Python"], "missingSkills": ["Docker"],
 "suggestions": [{"keyword": "Docker", "section": "Skills", "suggestion": "Add Docker"}, {"keyword": "Kube"#]);
        let err = analyze_resume("Python developer", JD, &generator)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_optimize_reports_incorporation() {
        let generator = CannedGenerator::new(["SUMMARY\nBackend engineer running Kubernetes.\n"]);
        let comparison = CandidateComparison {
            matched_skills: vec!["Python".to_string()],
            missing_skills: vec!["Kubernetes".to_string(), "GraphQL".to_string()],
            ..Default::default()
        };
        let optimized = optimize_resume("resume", JD, &comparison, &generator)
            .await
            .unwrap();
        assert_eq!(optimized.incorporation.incorporated_skills, vec!["Kubernetes"]);
        assert_eq!(optimized.incorporation.remaining_missing_skills, vec!["GraphQL"]);
        assert_eq!(optimized.incorporation.incorporation_rate, 50);
        assert!(optimized.optimized_resume.starts_with("SUMMARY"));
    }

    #[tokio::test]
    async fn test_optimize_requires_real_job_description() {
        let generator = CannedGenerator::new(["text"]);
        let err = optimize_resume("resume", "too short", &CandidateComparison::default(), &generator)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_optimized_output_is_rejected() {
        let generator = CannedGenerator::new(["   \n"]);
        let err = optimize_resume("resume", JD, &CandidateComparison::default(), &generator)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
