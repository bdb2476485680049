/// Evaluation client: the single point of entry for calls to the evaluation service.
///
/// No other module talks to the service directly. Two endpoints are consumed:
/// `GET {base}/roles` and `POST {base}/evaluate`. Calls are made once: no retry,
/// no backoff. A request timeout applies only when configured.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{EvaluationResult, Role, SkillProfile};

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Evaluation service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },
}

impl EvaluationError {
    /// Message shown in the session banner.
    pub fn display_message(&self) -> String {
        match self {
            EvaluationError::Http(e) if e.is_decode() => {
                "The evaluation service sent a response that could not be read.".to_string()
            }
            EvaluationError::Http(_) => {
                "Could not reach the evaluation service. Please try again.".to_string()
            }
            EvaluationError::Api { message, .. } => message.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    role: &'a str,
    student_profile: &'a SkillProfile,
    weekly_hours: f64,
    weeks: u32,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<String>,
}

/// The seam handlers depend on. `EvaluationClient` is the production backend.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    async fn roles(&self) -> Result<Vec<Role>, EvaluationError>;

    async fn evaluate(
        &self,
        role_id: &str,
        profile: &SkillProfile,
    ) -> Result<EvaluationResult, EvaluationError>;
}

#[derive(Clone)]
pub struct EvaluationClient {
    client: Client,
    base_url: String,
    weekly_hours: f64,
    plan_weeks: u32,
}

impl EvaluationClient {
    pub fn new(config: &Config) -> Result<Self, EvaluationError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.evaluation_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.evaluation_api_base_url.trim_end_matches('/').to_string(),
            weekly_hours: config.weekly_hours,
            plan_weeks: config.plan_weeks,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl EvaluationService for EvaluationClient {
    async fn roles(&self) -> Result<Vec<Role>, EvaluationError> {
        let response = self.client.get(self.url("roles")).send().await?;
        let response = ensure_success(response).await?;
        let roles: Vec<Role> = response.json().await?;
        debug!("Fetched {} roles from evaluation service", roles.len());
        Ok(roles)
    }

    async fn evaluate(
        &self,
        role_id: &str,
        profile: &SkillProfile,
    ) -> Result<EvaluationResult, EvaluationError> {
        let body = EvaluateRequest {
            role: role_id,
            student_profile: profile,
            weekly_hours: self.weekly_hours,
            weeks: self.plan_weeks,
        };

        let response = self
            .client
            .post(self.url("evaluate"))
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let result: EvaluationResult = response.json().await?;

        debug!(
            "Evaluation succeeded: role={role_id}, weeks={}, resources={}",
            result.plan.weeks.len(),
            result.plan.selected_resources.len()
        );
        Ok(result)
    }
}

/// Maps a non-2xx response to `EvaluationError::Api`, taking the message from
/// an `{ "error": "..." }` body when there is one.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, EvaluationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Evaluation service returned {status}: {body}");

    Err(EvaluationError::Api {
        status: status.as_u16(),
        message: error_message(status.as_u16(), &body),
    })
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}
