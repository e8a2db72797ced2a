//! AI advisor — follow-up questions, encouragement notes, and the final
//! analysis, backed by rig-core.
//!
//! The advisor is consumed through the [`Advisor`] trait so the flow logic
//! never depends on a concrete provider; tests substitute stubs.

pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use rig::agent::Agent;
use rig::client::CompletionClient;
use rig::completion::{CompletionModel, Prompt};
use secrecy::{ExposeSecret, SecretString};

use crate::error::AdvisorError;
use crate::flow::Response;

/// The AI text-generation collaborator.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Generate one follow-up question for the current step. Failure blocks
    /// advancement; the caller may retry by resubmitting.
    async fn generate_follow_up(
        &self,
        question: &str,
        answer: &str,
        prior: &[Response],
    ) -> Result<String, AdvisorError>;

    /// Generate a short supportive note for a just-answered step. Failure is
    /// never fatal to advancement.
    async fn generate_encouragement(
        &self,
        question: &str,
        answer: &str,
        follow_up_answer: Option<&str>,
    ) -> Result<String, AdvisorError>;

    /// Generate the synchronous BUILD/PIVOT/KILL analysis over the full
    /// response set.
    async fn generate_final_analysis(&self, responses: &[Response]) -> Result<String, AdvisorError>;
}

/// Configuration for creating an advisor.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: SecretString,
    pub model: String,
}

/// rig-core backed advisor holding one pre-built agent per prompt role.
pub struct RigAdvisor<M: CompletionModel> {
    follow_up: Agent<M>,
    encouragement: Agent<M>,
    analysis: Agent<M>,
    model: String,
}

/// Create an OpenAI-backed advisor from configuration.
pub fn openai_advisor(config: &AdvisorConfig) -> Result<Arc<dyn Advisor>, AdvisorError> {
    use rig::providers::openai;

    let client: rig::client::Client<openai::client::OpenAIResponsesExt> =
        openai::Client::new(config.api_key.expose_secret()).map_err(|e| {
            AdvisorError::RequestFailed {
                reason: format!("Failed to create OpenAI client: {e}"),
            }
        })?;

    tracing::info!("Using OpenAI advisor (model: {})", config.model);
    Ok(Arc::new(RigAdvisor {
        follow_up: client
            .agent(&config.model)
            .preamble(prompts::FOLLOW_UP_SYSTEM)
            .build(),
        encouragement: client
            .agent(&config.model)
            .preamble(prompts::ENCOURAGEMENT_SYSTEM)
            .build(),
        analysis: client
            .agent(&config.model)
            .preamble(prompts::ANALYSIS_SYSTEM)
            .build(),
        model: config.model.clone(),
    }))
}

impl<M: CompletionModel> RigAdvisor<M> {
    async fn prompt(agent: &Agent<M>, text: String) -> Result<String, AdvisorError> {
        let completion = agent
            .prompt(text)
            .await
            .map_err(|e| AdvisorError::RequestFailed {
                reason: e.to_string(),
            })?;

        let completion = completion.trim().to_string();
        if completion.is_empty() {
            return Err(AdvisorError::EmptyCompletion);
        }
        Ok(completion)
    }
}

#[async_trait]
impl<M> Advisor for RigAdvisor<M>
where
    M: CompletionModel + 'static,
{
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate_follow_up(
        &self,
        question: &str,
        answer: &str,
        prior: &[Response],
    ) -> Result<String, AdvisorError> {
        Self::prompt(
            &self.follow_up,
            prompts::follow_up_prompt(question, answer, prior),
        )
        .await
    }

    async fn generate_encouragement(
        &self,
        question: &str,
        answer: &str,
        follow_up_answer: Option<&str>,
    ) -> Result<String, AdvisorError> {
        Self::prompt(
            &self.encouragement,
            prompts::encouragement_prompt(question, answer, follow_up_answer),
        )
        .await
    }

    async fn generate_final_analysis(&self, responses: &[Response]) -> Result<String, AdvisorError> {
        Self::prompt(&self.analysis, prompts::analysis_prompt(responses)).await
    }
}
