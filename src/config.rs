//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Timing knobs for the interview flow.
#[derive(Debug, Clone)]
pub struct FlowTiming {
    /// Duration of each transition phase (exit, then enter).
    pub phase: Duration,
    /// How long an assistant note stays visible before it auto-clears.
    pub note_display: Duration,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            phase: Duration::from_millis(600),
            note_display: Duration::from_secs(4),
        }
    }
}

/// Service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the REST server binds to.
    pub bind_addr: String,
    /// OpenAI API key for the advisor.
    pub openai_api_key: SecretString,
    /// Advisor model name.
    pub model: String,
    /// Workflow webhook that receives completed sessions.
    pub onboarding_webhook_url: String,
    /// Profile fetch/store webhook for the standalone review page.
    pub profile_webhook_url: String,
    /// Flow timing knobs.
    pub timing: FlowTiming,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `OPENAI_API_KEY`, `ONBOARDING_WEBHOOK_URL` and `PROFILE_WEBHOOK_URL`
    /// are required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |key: &str| {
            std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
        };

        let port: u16 = match std::env::var("INTAKE_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INTAKE_PORT".to_string(),
                message: format!("not a port number: {raw}"),
            })?,
            Err(_) => 3000,
        };

        Ok(Self {
            bind_addr: format!("0.0.0.0:{port}"),
            openai_api_key: SecretString::from(required("OPENAI_API_KEY")?),
            model: std::env::var("INTAKE_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            onboarding_webhook_url: required("ONBOARDING_WEBHOOK_URL")?,
            profile_webhook_url: required("PROFILE_WEBHOOK_URL")?,
            timing: FlowTiming::default(),
        })
    }
}
