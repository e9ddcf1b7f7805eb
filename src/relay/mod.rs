//! Relays to the external vision and coaching models.
//!
//! The evaluator core never sees model text: the [`ScreenAnalyzer`] and
//! [`Coach`] traits hand back typed [`Analysis`] and [`Guidance`] values,
//! substituting fallbacks when the model's output cannot be parsed.

pub mod coaching;
pub mod model;
pub mod parse;
pub mod prompts;
pub mod screenshot;
pub mod vision;

pub use coaching::{Coach, LlmCoach};
pub use model::{Analysis, Guidance, MousePosition, StepStatus};
pub use screenshot::Screenshot;
pub use vision::{AnalysisContext, LlmScreenAnalyzer, ScreenAnalyzer};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::checklist::Step;
    use crate::error::LlmError;
    use crate::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};

    /// Stub provider returning canned text and recording requests.
    struct StubLlm {
        reply: String,
        delay: Duration,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubLlm {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn slow(reply: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                delay,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(CompletionResponse {
                content: self.reply.clone(),
                input_tokens: 0,
                output_tokens: 0,
                finish_reason: FinishReason::Stop,
            })
        }
    }

    fn screenshot() -> Screenshot {
        Screenshot {
            bytes: b"\x89PNG\r\n\x1a\n".to_vec(),
            mime_type: "image/png",
        }
    }

    fn email_step() -> Step {
        Step::new(2, "Enter valid email address").with_required_fields(&["email"])
    }

    #[tokio::test]
    async fn analyzer_sends_image_and_parses_reply() {
        let llm = StubLlm::new(
            r#"```json
{"filled_fields": ["Email"], "current_page": "Signup", "step_match": true}
```"#,
        );
        let analyzer = LlmScreenAnalyzer::new(llm.clone(), Duration::from_secs(5));
        let step = email_step();
        let context = AnalysisContext {
            checklist_name: "Jira Account Setup",
            step: &step,
            mouse_position: Some(MousePosition { x: 10.0, y: 20.0 }),
        };

        let analysis = analyzer.analyze(&screenshot(), &context).await.unwrap();
        assert_eq!(analysis.filled_fields, ["Email"]);
        assert!(analysis.step_match);

        let seen = llm.seen.lock().unwrap();
        let message = &seen[0].messages[0];
        assert_eq!(message.images.len(), 1);
        assert_eq!(message.images[0].mime_type, "image/png");
        assert!(message.content.contains("x=10, y=20"));
        assert_eq!(seen[0].temperature, Some(vision::ANALYSIS_TEMPERATURE));
        assert_eq!(seen[0].max_tokens, Some(vision::ANALYSIS_MAX_TOKENS));
    }

    #[tokio::test]
    async fn analyzer_falls_back_on_prose() {
        let llm = StubLlm::new("Looks like a signup page to me!");
        let analyzer = LlmScreenAnalyzer::new(llm, Duration::from_secs(5));
        let step = email_step();
        let context = AnalysisContext {
            checklist_name: "Jira Account Setup",
            step: &step,
            mouse_position: None,
        };

        let analysis = analyzer.analyze(&screenshot(), &context).await.unwrap();
        assert_eq!(analysis.current_page, model::UNPARSED_PAGE);
        assert_eq!(
            analysis.raw_analysis.as_deref(),
            Some("Looks like a signup page to me!")
        );
    }

    #[tokio::test]
    async fn analyzer_times_out() {
        let llm = StubLlm::slow("{}", Duration::from_secs(5));
        let analyzer = LlmScreenAnalyzer::new(llm, Duration::from_millis(20));
        let step = email_step();
        let context = AnalysisContext {
            checklist_name: "Jira Account Setup",
            step: &step,
            mouse_position: None,
        };

        let err = analyzer.analyze(&screenshot(), &context).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout { .. }));
    }

    #[tokio::test]
    async fn coach_parses_verdict() {
        let llm = StubLlm::new(r#"{"step_status": "correct", "message": "Nice work!"}"#);
        let coach = LlmCoach::new(llm.clone(), Duration::from_secs(5));
        let analysis = Analysis {
            current_page: "Signup".to_string(),
            ..Default::default()
        };

        let guidance = coach
            .coach(&analysis, &email_step(), "Jira Account Setup")
            .await
            .unwrap();
        assert_eq!(guidance.step_status, StepStatus::Correct);
        assert_eq!(guidance.message, "Nice work!");

        let seen = llm.seen.lock().unwrap();
        assert!(seen[0].messages[0].images.is_empty());
        assert!(seen[0].messages[0].content.contains("Current page: Signup"));
        assert_eq!(seen[0].temperature, Some(coaching::COACHING_TEMPERATURE));
        assert_eq!(seen[0].max_tokens, Some(coaching::COACHING_MAX_TOKENS));
    }

    #[tokio::test]
    async fn coach_caps_unparsed_reply() {
        let llm = StubLlm::new(&"Click the blue button. ".repeat(40));
        let coach = LlmCoach::new(llm, Duration::from_secs(5));
        let guidance = coach
            .coach(&Analysis::default(), &email_step(), "Jira Account Setup")
            .await
            .unwrap();
        assert_eq!(guidance.step_status, StepStatus::Unknown);
        assert!(guidance.message.chars().count() <= model::MAX_GUIDANCE_CHARS);
    }
}
