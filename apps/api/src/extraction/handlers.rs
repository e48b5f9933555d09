//! Axum route handlers for the Job Extraction API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::extractor::extract_job_details;
use crate::extraction::schema::{ExtractedJobFields, SchemaCoercionWarning};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractJobRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractJobResponse {
    pub job_details: ExtractedJobFields,
    pub suggested_file_name: String,
    pub warnings: Vec<SchemaCoercionWarning>,
}

/// POST /api/v1/jobs/extract
///
/// Extracts the structured job fields from a pasted or scraped posting.
pub async fn handle_extract_job(
    State(state): State<AppState>,
    Json(request): Json<ExtractJobRequest>,
) -> Result<Json<ExtractJobResponse>, AppError> {
    let extraction = extract_job_details(&request.job_description, state.generator.as_ref()).await?;
    let suggested_file_name = extraction
        .fields
        .resume_file_name(chrono::Utc::now().date_naive());

    Ok(Json(ExtractJobResponse {
        job_details: extraction.fields,
        suggested_file_name,
        warnings: extraction.warnings,
    }))
}
