use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::analysis::interpreter::{interpret, InterpretError, ValidatedAnalysis};
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::extractor::TextExtractor;
use crate::llm_client::InferenceClient;

/// Runs one upload through extract → prompt → infer → interpret.
///
/// Each stage completes before the next starts; the first failure ends the
/// pipeline, so an extraction failure never reaches the model.
pub async fn analyze_resume(
    document: Bytes,
    extractor: &dyn TextExtractor,
    llm: &dyn InferenceClient,
) -> Result<ValidatedAnalysis, AppError> {
    let resume_text = extractor.extract(document).await?;
    debug!("Extracted {} chars of resume text", resume_text.len());

    let prompt = build_analysis_prompt(&resume_text);
    info!("Requesting analysis from {}", llm.model());
    let raw_output = llm.complete(&prompt).await?.concat();
    debug!("Raw model output: {raw_output}");

    let analysis = interpret(&raw_output).map_err(|e| {
        log_interpret_failure(&e, &raw_output);
        e
    })?;

    let skills_total = analysis.result.skills_total();
    if skills_total != 100 {
        warn!("Skill percentages sum to {skills_total}, expected 100");
    }

    Ok(analysis)
}

// Logged here rather than in `IntoResponse` so the lines carry the request span.
fn log_interpret_failure(err: &InterpretError, raw_output: &str) {
    match err {
        InterpretError::InvalidJson { candidate, source } => {
            error!("Error parsing JSON: {source}; attempted to parse: {candidate}")
        }
        other => error!("Failed to interpret model output: {other}"),
    }
    error!("Raw model output: {raw_output}");
}
