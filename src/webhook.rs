//! Webhook forwarding — hands a completed session to the external
//! workflow-automation service for analysis.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WebhookError;
use crate::flow::Response;

/// Payload posted to the workflow webhook when a session is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub session_id: String,
    pub responses: Vec<Response>,
    pub completed_at: DateTime<Utc>,
    pub total_questions: usize,
    /// Set when the session was populated by the skip-to-end diagnostic path.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

/// Classified reply from the workflow webhook.
///
/// Per the collaborator's contract, a reply carrying an `analysis` field means
/// the analysis ran synchronously; a reply carrying a `message` field means
/// the workflow was accepted and runs asynchronously. Anything else is kept
/// raw for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    AnalysisReady(serde_json::Value),
    WorkflowStarted(String),
    Unknown(serde_json::Value),
}

impl ForwardOutcome {
    /// Classify a raw webhook reply.
    pub fn classify(raw: serde_json::Value) -> Self {
        if let Some(analysis) = raw.get("analysis") {
            return Self::AnalysisReady(analysis.clone());
        }
        if let Some(message) = raw.get("message").and_then(|m| m.as_str()) {
            return Self::WorkflowStarted(message.to_string());
        }
        Self::Unknown(raw)
    }
}

/// The workflow-automation collaborator.
#[async_trait]
pub trait WebhookForwarder: Send + Sync {
    /// Forward a completed session. Returns the classified reply.
    async fn forward(&self, payload: &SubmissionPayload) -> Result<ForwardOutcome, WebhookError>;
}

/// Forwards submissions to the configured webhook over HTTP.
pub struct HttpForwarder {
    client: reqwest::Client,
    url: String,
}

impl HttpForwarder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl WebhookForwarder for HttpForwarder {
    async fn forward(&self, payload: &SubmissionPayload) -> Result<ForwardOutcome, WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WebhookError::InvalidBody(e.to_string()))?;

        tracing::debug!(session_id = %payload.session_id, "Webhook forward succeeded");
        Ok(ForwardOutcome::classify(raw))
    }
}

/// Thin JSON passthrough to the workflow webhook, for the proxy route. No
/// logic beyond status mapping lives here.
pub struct WebhookProxy {
    client: reqwest::Client,
    url: String,
}

impl WebhookProxy {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Forward an arbitrary JSON body and hand back the upstream reply.
    pub async fn forward_raw(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| WebhookError::InvalidBody(e.to_string()))
    }
}
