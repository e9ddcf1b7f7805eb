//! Parsing of model text into analyses and guidance, with fallbacks.
//!
//! Models wrap JSON in markdown fences or surround it with prose. Parsing
//! never fails: text that does not yield the expected object becomes the
//! documented fallback value instead.

use serde::Deserialize;
use tracing::warn;

use super::model::{Analysis, Guidance, StepStatus};

/// Extract a JSON object from model output that might contain markdown or
/// extra text.
pub fn extract_json_object(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        let end = after.find("```").unwrap_or(after.len());
        return after[..end].trim();
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let end = after.find("```").unwrap_or(after.len());
        return after[..end].trim();
    }

    if trimmed.starts_with('{') {
        return trimmed;
    }

    // Try to find object bounds in surrounding prose
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    trimmed
}

/// Parse vision model output into an [`Analysis`].
///
/// Unparseable output yields [`Analysis::unparsed`] carrying the raw text.
pub fn parse_analysis(text: &str) -> Analysis {
    match serde_json::from_str::<Analysis>(extract_json_object(text)) {
        Ok(mut analysis) => {
            // Fields only the coach itself sets
            analysis.raw_analysis = None;
            analysis.mouse_position = None;
            analysis
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse screen analysis, using fallback");
            Analysis::unparsed(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGuidance {
    #[serde(default)]
    step_status: Option<String>,
    #[serde(default)]
    message: String,
}

/// Parse coaching model output into [`Guidance`].
///
/// Unparseable output becomes `unknown` status with the trimmed raw text as
/// the message. The message cap applies on both paths.
pub fn parse_guidance(text: &str) -> Guidance {
    let trimmed = text.trim();
    match serde_json::from_str::<RawGuidance>(extract_json_object(trimmed)) {
        Ok(raw) => {
            let status = raw
                .step_status
                .as_deref()
                .map(StepStatus::from_model)
                .unwrap_or(StepStatus::Unknown);
            Guidance::new(status, raw.message)
        }
        Err(e) => {
            warn!(error = %e, response = trimmed, "Failed to parse coaching guidance, using fallback");
            Guidance::new(StepStatus::Unknown, trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::model::{MAX_GUIDANCE_CHARS, UNPARSED_PAGE};

    #[test]
    fn extract_direct_object() {
        let input = r#"{"current_page": "Signup"}"#;
        assert_eq!(extract_json_object(input), input);
    }

    #[test]
    fn extract_from_json_fence() {
        let input = "Here you go:\n```json\n{\"a\": 1}\n```\nanything else?";
        assert_eq!(extract_json_object(input), "{\"a\": 1}");
    }

    #[test]
    fn extract_from_plain_fence() {
        let input = "```\n{\"a\": 2}\n```";
        assert_eq!(extract_json_object(input), "{\"a\": 2}");
    }

    #[test]
    fn extract_from_surrounding_prose() {
        let input = "Sure! {\"a\": 3} hope that helps";
        assert_eq!(extract_json_object(input), "{\"a\": 3}");
    }

    #[test]
    fn analysis_from_fenced_json() {
        let text = r#"```json
{
  "visible_elements": ["Email input", "Continue button"],
  "form_fields": ["Email"],
  "filled_fields": ["Email"],
  "errors_visible": [],
  "current_page": "Jira signup",
  "step_match": true,
  "issues_detected": []
}
```"#;
        let analysis = parse_analysis(text);
        assert_eq!(analysis.current_page, "Jira signup");
        assert!(analysis.step_match);
        assert_eq!(analysis.filled_fields, ["Email"]);
        assert!(!analysis.is_unparsed());
    }

    #[test]
    fn malformed_analysis_falls_back_with_raw_text() {
        let text = "I see a login page but cannot produce JSON.";
        let analysis = parse_analysis(text);
        assert_eq!(analysis.current_page, UNPARSED_PAGE);
        assert!(!analysis.step_match);
        assert!(analysis.filled_fields.is_empty());
        assert!(analysis.errors_visible.is_empty());
        assert_eq!(analysis.raw_analysis.as_deref(), Some(text));
    }

    #[test]
    fn truncated_json_falls_back() {
        let analysis = parse_analysis("```json\n{\"visible_elements\": [\"a\"\n```");
        assert!(analysis.is_unparsed());
    }

    #[test]
    fn guidance_from_json() {
        let guidance =
            parse_guidance(r#"{"step_status": "incomplete", "message": "Good, now click it!"}"#);
        assert_eq!(guidance.step_status, StepStatus::Incomplete);
        assert_eq!(guidance.message, "Good, now click it!");
    }

    #[test]
    fn guidance_with_unexpected_status_is_unknown() {
        let guidance = parse_guidance(r#"{"step_status": "almost", "message": "Keep going"}"#);
        assert_eq!(guidance.step_status, StepStatus::Unknown);
    }

    #[test]
    fn long_guidance_message_is_truncated() {
        let message = "x".repeat(400);
        let text = format!(r#"{{"step_status": "correct", "message": "{message}"}}"#);
        let guidance = parse_guidance(&text);
        assert_eq!(guidance.step_status, StepStatus::Correct);
        assert_eq!(guidance.message.chars().count(), MAX_GUIDANCE_CHARS);
        assert!(guidance.message.ends_with("..."));
    }

    #[test]
    fn malformed_guidance_falls_back_to_raw_text() {
        let guidance = parse_guidance("  You're on the right page, click Create.  ");
        assert_eq!(guidance.step_status, StepStatus::Unknown);
        assert_eq!(guidance.message, "You're on the right page, click Create.");
    }

    #[test]
    fn malformed_long_guidance_is_capped() {
        let guidance = parse_guidance(&"word ".repeat(200));
        assert_eq!(guidance.step_status, StepStatus::Unknown);
        assert!(guidance.message.chars().count() <= MAX_GUIDANCE_CHARS);
    }
}
