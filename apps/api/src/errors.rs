use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::interpreter::InterpretError;
use crate::extractor::ExtractionError;
use crate::llm_client::LlmError;

pub const MISSING_FILE_MESSAGE: &str = "No file uploaded";
pub const EXTRACTION_MESSAGE: &str =
    "Error analyzing resume: could not extract text from the uploaded file.";
pub const SERVICE_MESSAGE: &str = "Error connecting to AI service. Please try again later.";
pub const PARSE_MESSAGE: &str = "Failed to parse AI response. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": "<message>"}`; details stay in the logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingInput,

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Inference error: {0}")]
    Inference(#[from] LlmError),

    #[error("Interpretation error: {0}")]
    Interpretation(#[from] InterpretError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingInput => (StatusCode::BAD_REQUEST, MISSING_FILE_MESSAGE.to_string()),
            AppError::Upload(e) => {
                tracing::warn!("Rejected upload: {e}");
                (e.status(), e.body_text())
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    EXTRACTION_MESSAGE.to_string(),
                )
            }
            AppError::Inference(e) => {
                tracing::error!("Inference error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_MESSAGE.to_string())
            }
            // Diagnostics and raw output are logged by the pipeline, inside the request span.
            AppError::Interpretation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, PARSE_MESSAGE.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
