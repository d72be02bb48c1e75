use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub const WELCOME_TEXT: &str = "Welcome to the Resume Analysis API";

/// GET /
pub async fn welcome_handler() -> &'static str {
    WELCOME_TEXT
}

/// GET /health
/// Returns a simple status object with service version and model.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-api",
        "model": state.llm.model()
    }))
}
