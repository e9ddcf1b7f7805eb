//! Screen analysis through a multimodal model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use super::model::{Analysis, MousePosition};
use super::parse::parse_analysis;
use super::prompts::analysis_prompt;
use super::screenshot::Screenshot;
use crate::checklist::Step;
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Sampling temperature for screen analysis.
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;
/// Output cap for one analysis reply.
pub const ANALYSIS_MAX_TOKENS: u32 = 1024;

/// What the vision model needs to know besides the image.
#[derive(Debug, Clone)]
pub struct AnalysisContext<'a> {
    pub checklist_name: &'a str,
    pub step: &'a Step,
    pub mouse_position: Option<MousePosition>,
}

/// Turns a screenshot into a structured [`Analysis`].
///
/// Malformed model output is never an error; it produces the fallback
/// analysis. Errors mean the model could not be reached at all.
#[async_trait]
pub trait ScreenAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        screenshot: &Screenshot,
        context: &AnalysisContext<'_>,
    ) -> Result<Analysis, LlmError>;
}

/// [`ScreenAnalyzer`] backed by an [`LlmProvider`].
pub struct LlmScreenAnalyzer {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl LlmScreenAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }
}

#[async_trait]
impl ScreenAnalyzer for LlmScreenAnalyzer {
    async fn analyze(
        &self,
        screenshot: &Screenshot,
        context: &AnalysisContext<'_>,
    ) -> Result<Analysis, LlmError> {
        let prompt = analysis_prompt(
            context.checklist_name,
            context.step,
            context.mouse_position.as_ref(),
        );
        let request = CompletionRequest::new(vec![
            ChatMessage::user(prompt).with_image(screenshot.mime_type, screenshot.bytes.clone()),
        ])
        .with_temperature(ANALYSIS_TEMPERATURE)
        .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| LlmError::Timeout {
                provider: self.llm.model_name().to_string(),
                timeout: self.timeout,
            })??;

        let analysis = parse_analysis(&response.content);
        if analysis.is_unparsed() {
            warn!(step = context.step.id, "Vision model returned unparseable analysis");
        } else {
            info!(
                step = context.step.id,
                step_match = analysis.step_match,
                filled = analysis.filled_fields.len(),
                errors = analysis.errors_visible.len(),
                "Screenshot analyzed"
            );
        }
        Ok(analysis)
    }
}
