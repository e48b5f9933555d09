//! Axum route handlers for resume analysis and optimization.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::analyzer::{analyze_resume, optimize_resume};
use crate::analysis::comparison::{CandidateComparison, ComparisonOutcome, ComparisonResult};
use crate::analysis::incorporation::IncorporationReport;
use crate::errors::AppError;
use crate::resume::handlers::resolve_resume_text;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_id: Option<Uuid>,
    pub resume_text: Option<String>,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub resume_id: Option<Uuid>,
    pub resume_text: Option<String>,
    pub job_description: String,
    /// Output of the analyze route (or any object with matched/missing skill lists).
    pub comparison_result: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<Uuid>,
    pub optimized_resume: String,
    pub incorporation: IncorporationReport,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/analyze
///
/// Compares a resume with a job description. A model refusal (e.g. the job
/// description is too short to analyze) is reported as a 400 with its message.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ComparisonResult>, AppError> {
    let resume = resolve_resume_text(&state, request.resume_id, request.resume_text, false).await?;

    match analyze_resume(&resume, &request.job_description, state.generator.as_ref()).await? {
        ComparisonOutcome::Analysis(result) => Ok(Json(result)),
        ComparisonOutcome::Rejected { error } => Err(AppError::Validation(error)),
    }
}

/// POST /api/v1/resumes/optimize
///
/// Rewrites the resume to include missing skills and reports which of them made it in.
pub async fn handle_optimize_resume(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let Some(comparison) = request.comparison_result.as_ref() else {
        return Err(AppError::Validation(
            "comparisonResult is required".to_string(),
        ));
    };
    let comparison = CandidateComparison::from_value(comparison);
    let resume = resolve_resume_text(&state, request.resume_id, request.resume_text, false).await?;

    let optimized = optimize_resume(
        &resume,
        &request.job_description,
        &comparison,
        state.generator.as_ref(),
    )
    .await?;

    if let Some(id) = request.resume_id {
        if state
            .resumes
            .attach_optimized(id, optimized.optimized_resume.clone())
            .await
            .is_none()
        {
            warn!("Resume {id} expired before its optimized version could be stored");
        }
    }

    Ok(Json(OptimizeResponse {
        resume_id: request.resume_id,
        optimized_resume: optimized.optimized_resume,
        incorporation: optimized.incorporation,
        message: "Resume optimized successfully with ATS keywords integration".to_string(),
    }))
}
