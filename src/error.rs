//! Error types for Founder Intake.

/// Top-level error type for the onboarding engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Question-catalog construction errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog must contain at least one question")]
    Empty,

    #[error("Question ids must run 1..N without gaps: position {position} has id {id}")]
    NonContiguousId { position: usize, id: u32 },

    #[error("Question {id} is a choice question but has no options")]
    MissingOptions { id: u32 },

    #[error("Question {id} is a free-text question but carries options")]
    UnexpectedOptions { id: u32 },
}

/// AI advisor errors.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Advisor request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Advisor returned an empty completion")]
    EmptyCompletion,
}

/// Webhook-forwarding and profile-collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Webhook returned status {status}")]
    Status { status: u16 },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

/// Result type alias for the engine.
pub type Result<T> = std::result::Result<T, Error>;
