/// LLM Client — the single point of entry for model inference.
///
/// Handlers depend on the `InferenceClient` trait, never on `ReplicateClient`
/// directly. `AppState` carries an `Arc<dyn InferenceClient>` built once in
/// `main`, so tests substitute a fake without touching the network.
///
/// No retries: a failed prediction is reported to the caller as is.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "ibm-granite/granite-3.3-8b-instruct";
pub const DEFAULT_API_URL: &str = "https://api.replicate.com/v1";
const POLL_INTERVAL: Duration = Duration::from_millis(500);
const PREDICTION_DEADLINE: Duration = Duration::from_secs(300);
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("prediction {id} ended as {status}: {message}")]
    PredictionFailed {
        id: String,
        status: String,
        message: String,
    },

    #[error("prediction {id} did not finish within {secs}s")]
    DeadlineExceeded { id: String, secs: u64 },

    #[error("prediction {id} succeeded without output")]
    EmptyOutput { id: String },
}

/// Text-completion collaborator: prompt in, completion fragments out.
/// Callers concatenate the fragments in order.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Vec<String>, LlmError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: PredictionStatus,
    #[serde(default)]
    output: Option<PredictionOutput>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    fn is_pending(self) -> bool {
        matches!(self, PredictionStatus::Starting | PredictionStatus::Processing)
    }

    fn as_str(self) -> &'static str {
        match self {
            PredictionStatus::Starting => "starting",
            PredictionStatus::Processing => "processing",
            PredictionStatus::Succeeded => "succeeded",
            PredictionStatus::Failed => "failed",
            PredictionStatus::Canceled => "canceled",
            PredictionStatus::Unknown => "unknown",
        }
    }
}

/// Language models stream tokens, so output is usually a list of strings.
/// Some models return one string instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictionOutput {
    Fragments(Vec<String>),
    Text(String),
}

impl PredictionOutput {
    fn into_fragments(self) -> Vec<String> {
        match self {
            PredictionOutput::Fragments(fragments) => fragments,
            PredictionOutput::Text(text) => vec![text],
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

/// Replicate predictions API client.
///
/// `model` is either `owner/name` (latest deployment of an official model)
/// or `owner/name:version` (pinned version).
#[derive(Clone)]
pub struct ReplicateClient {
    client: Client,
    api_token: String,
    api_url: String,
    model: String,
    poll_interval: Duration,
    deadline: Duration,
}

impl ReplicateClient {
    pub fn new(api_token: String, api_url: String, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            api_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
            poll_interval: POLL_INTERVAL,
            deadline: PREDICTION_DEADLINE,
        })
    }

    #[cfg(test)]
    fn with_polling(mut self, poll_interval: Duration, deadline: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.deadline = deadline;
        self
    }

    /// Endpoint and optional pinned version for a new prediction.
    fn prediction_target(&self) -> (String, Option<&str>) {
        match self.model.split_once(':') {
            Some((_, version)) => (format!("{}/predictions", self.api_url), Some(version)),
            None => (
                format!("{}/models/{}/predictions", self.api_url, self.model),
                None,
            ),
        }
    }

    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, LlmError> {
        let (url, version) = self.prediction_target();
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&PredictionRequest {
                version,
                input: PredictionInput { prompt },
            })
            .send()
            .await?;
        read_prediction(response).await
    }

    async fn fetch_prediction(&self, url: &str) -> Result<Prediction, LlmError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        read_prediction(response).await
    }
}

#[async_trait]
impl InferenceClient for ReplicateClient {
    async fn complete(&self, prompt: &str) -> Result<Vec<String>, LlmError> {
        let started = Instant::now();
        let mut prediction = self.create_prediction(prompt).await?;

        while prediction.status.is_pending() {
            if started.elapsed() >= self.deadline {
                return Err(LlmError::DeadlineExceeded {
                    id: prediction.id,
                    secs: self.deadline.as_secs(),
                });
            }
            let Some(poll_url) = prediction.urls.as_ref().map(|u| u.get.clone()) else {
                return Err(LlmError::PredictionFailed {
                    id: prediction.id,
                    status: prediction.status.as_str().to_string(),
                    message: "pending prediction has no polling URL".to_string(),
                });
            };
            debug!(
                "Prediction {} is {}, polling",
                prediction.id,
                prediction.status.as_str()
            );
            tokio::time::sleep(self.poll_interval).await;
            prediction = self.fetch_prediction(&poll_url).await?;
        }

        debug!(
            "Prediction {} finished as {} after {}ms",
            prediction.id,
            prediction.status.as_str(),
            started.elapsed().as_millis()
        );

        finish(prediction)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

async fn read_prediction(response: reqwest::Response) -> Result<Prediction, LlmError> {
    let status = response.status();
    if !status.is_success() {
        return Err(api_error(status, response.text().await.unwrap_or_default()));
    }
    Ok(response.json().await?)
}

fn api_error(status: StatusCode, body: String) -> LlmError {
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or(body);
    LlmError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Converts a terminal prediction into completion fragments.
fn finish(prediction: Prediction) -> Result<Vec<String>, LlmError> {
    if prediction.status != PredictionStatus::Succeeded {
        let message = match prediction.error {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "no error detail".to_string(),
        };
        return Err(LlmError::PredictionFailed {
            id: prediction.id,
            status: prediction.status.as_str().to_string(),
            message,
        });
    }

    prediction
        .output
        .map(PredictionOutput::into_fragments)
        .ok_or(LlmError::EmptyOutput { id: prediction.id })
}
