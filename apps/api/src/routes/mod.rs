pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Room for multipart framing around the largest accepted file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Job API
        .route("/api/v1/jobs/extract", post(extraction::handle_extract_job))
        // Resume API
        .route("/api/v1/resumes", get(resume::handle_list_resumes))
        .route("/api/v1/resumes/upload", post(resume::handle_upload_resume))
        .route(
            "/api/v1/resumes/analyze",
            post(analysis::handle_analyze_resume),
        )
        .route(
            "/api/v1/resumes/optimize",
            post(analysis::handle_optimize_resume),
        )
        .route(
            "/api/v1/resumes/structure",
            post(resume::handle_structure_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resume::handle_get_resume).delete(resume::handle_delete_resume),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
