//! Profile persistence collaborator — plain fetch/store of review-page
//! profile data against the workflow service. No core logic lives here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::WebhookError;

/// One answered field of the profile, keyed by field id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileField {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,
    pub category: String,
}

/// Full profile data as returned by the collaborator.
pub type ProfileData = HashMap<String, ProfileField>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileEnvelope {
    #[serde(default)]
    profile_data: Option<ProfileData>,
}

/// HTTP client for the profile webhook.
pub struct ProfileClient {
    client: reqwest::Client,
    url: String,
}

impl ProfileClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn post(&self, body: serde_json::Value) -> Result<reqwest::Response, WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Fetch the stored profile for a session. Missing data yields an empty map.
    pub async fn fetch(&self, session_id: &str) -> Result<ProfileData, WebhookError> {
        let response = self
            .post(json!({
                "sessionId": session_id,
                "action": "getProfile",
                "history": [],
            }))
            .await?;

        let envelope: ProfileEnvelope = response
            .json()
            .await
            .map_err(|e| WebhookError::InvalidBody(e.to_string()))?;
        Ok(envelope.profile_data.unwrap_or_default())
    }

    /// Persist edited profile data for a session.
    pub async fn submit(
        &self,
        session_id: &str,
        profile_data: &ProfileData,
    ) -> Result<serde_json::Value, WebhookError> {
        let response = self
            .post(json!({
                "sessionId": session_id,
                "action": "submitProfile",
                "profileData": profile_data,
            }))
            .await?;

        response
            .json()
            .await
            .map_err(|e| WebhookError::InvalidBody(e.to_string()))
    }
}
