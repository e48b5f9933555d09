//! Job extractor: posting text → model completion → recovered JSON → enforced schema.

use tracing::info;

use crate::errors::AppError;
use crate::extraction::prompts::build_job_extraction_prompt;
use crate::extraction::schema::{enforce_schema, JobFieldsExtraction};
use crate::llm_client::json_recovery::parse_model_json;
use crate::llm_client::{LlmError, TextGenerator};

/// Upper bound on posting size accepted for extraction.
pub const MAX_POSTING_CHARS: usize = 500_000;

/// Extracts structured job fields from a raw posting.
pub async fn extract_job_details(
    posting: &str,
    generator: &dyn TextGenerator,
) -> Result<JobFieldsExtraction, AppError> {
    if posting.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description text is required".to_string(),
        ));
    }
    if posting.chars().count() > MAX_POSTING_CHARS {
        return Err(AppError::Validation(format!(
            "Job description too long. Maximum {MAX_POSTING_CHARS} characters allowed."
        )));
    }

    let prompt = build_job_extraction_prompt(posting);
    let raw = generator
        .generate(&prompt)
        .await
        .map_err(|e| AppError::from_llm("job details", e))?;

    let object = parse_model_json(&raw)
        .map_err(|e| AppError::from_llm("job details", LlmError::Parse(e)))?;

    let extraction = enforce_schema(&object);
    info!(
        "Extracted job details: company={}, title={}, {} field(s) repaired",
        extraction.fields.company,
        extraction.fields.title,
        extraction.warnings.len()
    );

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::CannedGenerator;

    #[tokio::test]
    async fn test_fenced_reply_with_prose_is_extracted() {
        let generator = CannedGenerator::new([
            "Here is the JSON:\n```json\n{\"company\":\"Acme\",\"title\":\"Engineer\"}\n```\nHope this helps!",
        ]);
        let extraction = extract_job_details("Acme is hiring an Engineer.", &generator)
            .await
            .unwrap();
        assert_eq!(extraction.fields.company, "Acme");
        assert_eq!(extraction.fields.title, "Engineer");
        assert_eq!(extraction.fields.salary, "N/A");
        assert!(extraction.fields.requirements.is_empty());
    }

    #[tokio::test]
    async fn test_blank_posting_is_rejected_without_calling_model() {
        let generator = CannedGenerator::new(["{}"]);
        let err = extract_job_details("   ", &generator).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_posting_is_rejected() {
        let generator = CannedGenerator::new(["{}"]);
        let posting = "a".repeat(MAX_POSTING_CHARS + 1);
        let err = extract_job_details(&posting, &generator).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_unprocessable() {
        let generator = CannedGenerator::new(["Sorry, I can't help with that."]);
        let err = extract_job_details("Some posting", &generator)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
