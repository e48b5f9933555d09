//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::ats_check::{check_ats_compatibility, AtsCheck};
use crate::resume::experience::{group_experience, ExperienceEntry};
use crate::resume::sections::{parse_resume, SectionKey, StructuredResumeDocument};
use crate::resume::store::ResumeSummary;
use crate::resume::upload::{detect_kind, extract_upload_text};
use crate::state::AppState;

/// Multipart field carrying the resume file.
const UPLOAD_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResumeResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRequest {
    pub resume_id: Option<Uuid>,
    pub resume_text: Option<String>,
    /// Structure the stored optimized text instead of the original upload.
    #[serde(default)]
    pub optimized: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResponse {
    pub document: StructuredResumeDocument,
    pub experience: Vec<ExperienceEntry>,
    pub ats_check: AtsCheck,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/upload
///
/// Accepts a PDF or TXT file in the `resume` multipart field and stores its text.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeSummary>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let kind = detect_kind(field.content_type(), &file_name)?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;

        let text = extract_upload_text(kind, data, state.config.max_upload_bytes).await?;
        let stored = state.resumes.insert(file_name, text).await;
        info!("Uploaded resume {} ({})", stored.id, stored.file_name);
        return Ok(Json(stored.summary()));
    }

    Err(AppError::Validation(format!(
        "No file uploaded. Send the resume in the '{UPLOAD_FIELD}' field"
    )))
}

/// GET /api/v1/resumes
///
/// Resume history: every live upload, oldest first.
pub async fn handle_list_resumes(State(state): State<AppState>) -> Json<Vec<ResumeSummary>> {
    Json(state.resumes.list().await)
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeSummary>, AppError> {
    state
        .resumes
        .summary(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResumeResponse>, AppError> {
    if !state.resumes.delete(id).await {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(Json(DeleteResumeResponse { id, deleted: true }))
}

/// POST /api/v1/resumes/structure
///
/// Splits resume text into sections, groups experience entries and runs the ATS check.
pub async fn handle_structure_resume(
    State(state): State<AppState>,
    Json(request): Json<StructureRequest>,
) -> Result<Json<StructureResponse>, AppError> {
    let text = resolve_resume_text(
        &state,
        request.resume_id,
        request.resume_text,
        request.optimized,
    )
    .await?;

    let document = parse_resume(&text)?;
    let experience = group_experience(document.section(SectionKey::Experience));
    let ats_check = check_ats_compatibility(&document);

    Ok(Json(StructureResponse {
        document,
        experience,
        ats_check,
    }))
}

/// Inline text wins over a stored resume. With `optimized`, the stored
/// optimized version is required.
pub async fn resolve_resume_text(
    state: &AppState,
    resume_id: Option<Uuid>,
    resume_text: Option<String>,
    optimized: bool,
) -> Result<String, AppError> {
    if let Some(text) = resume_text.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }
    let Some(id) = resume_id else {
        return Err(AppError::Validation(
            "Provide either resumeId or resumeText".to_string(),
        ));
    };

    let stored = state
        .resumes
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    if !optimized {
        return Ok(stored.text);
    }
    stored
        .optimized
        .map(|o| o.text)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} has no optimized version")))
}
