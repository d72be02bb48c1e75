//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::analysis::service::analyze_resume;
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the résumé document.
pub const RESUME_FIELD: &str = "resume";

/// POST /analyze
///
/// Accepts `multipart/form-data` with a `resume` file and returns the
/// model's evaluation object as emitted, once it has passed schema
/// validation. A request that is not multipart at all is treated
/// the same as one without the field.
#[instrument(skip_all, fields(analysis_id = %Uuid::new_v4()))]
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let multipart = multipart.map_err(|_| AppError::MissingInput)?;
    let document = read_resume_field(multipart)
        .await?
        .ok_or(AppError::MissingInput)?;

    info!("Analyzing resume upload ({} bytes)", document.len());
    let analysis = analyze_resume(document, state.extractor.as_ref(), state.llm.as_ref()).await?;
    info!(
        "Analysis complete: score {} ({:?})",
        analysis.result.overall.score, analysis.result.overall.rating_text
    );

    Ok(Json(analysis.json))
}

/// Returns the first non-empty `resume` field, skipping everything else.
async fn read_resume_field(mut multipart: Multipart) -> Result<Option<Bytes>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let data = field.bytes().await?;
        if !data.is_empty() {
            return Ok(Some(data));
        }
    }
    Ok(None)
}
