//! Coaching verdicts through a chat model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::model::{Analysis, Guidance};
use super::parse::parse_guidance;
use super::prompts::coaching_prompt;
use crate::checklist::Step;
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Sampling temperature for coaching verdicts.
pub const COACHING_TEMPERATURE: f32 = 0.3;
/// Output cap for one coaching reply.
pub const COACHING_MAX_TOKENS: u32 = 256;

/// Produces a short verdict on whether the user completed the expected step.
#[async_trait]
pub trait Coach: Send + Sync {
    async fn coach(
        &self,
        analysis: &Analysis,
        expected_step: &Step,
        checklist_name: &str,
    ) -> Result<Guidance, LlmError>;
}

/// [`Coach`] backed by an [`LlmProvider`].
pub struct LlmCoach {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl LlmCoach {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }
}

#[async_trait]
impl Coach for LlmCoach {
    async fn coach(
        &self,
        analysis: &Analysis,
        expected_step: &Step,
        checklist_name: &str,
    ) -> Result<Guidance, LlmError> {
        let prompt = coaching_prompt(checklist_name, expected_step, analysis);
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(COACHING_TEMPERATURE)
            .with_max_tokens(COACHING_MAX_TOKENS);

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| LlmError::Timeout {
                provider: self.llm.model_name().to_string(),
                timeout: self.timeout,
            })??;

        let guidance = parse_guidance(&response.content);
        info!(
            step = expected_step.id,
            status = %guidance.step_status,
            "Coaching guidance generated"
        );
        Ok(guidance)
    }
}
