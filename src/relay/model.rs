//! Screen analysis and coaching guidance models.

use serde::{Deserialize, Serialize};

/// `current_page` value used when the vision model's output could not be parsed.
pub const UNPARSED_PAGE: &str = "Unable to parse";

/// Maximum length, in characters, of a guidance message.
pub const MAX_GUIDANCE_CHARS: usize = 300;

/// Cursor coordinates reported by the client alongside a screenshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MousePosition {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl MousePosition {
    /// Whether the position carries a usable location. A zero coordinate is
    /// what browsers report before the cursor has entered the page.
    pub fn is_located(&self) -> bool {
        self.x != 0.0 && self.y != 0.0
    }
}

/// Structured description of what a screenshot shows.
///
/// Every field defaults so partial model output and partial client bodies
/// still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub visible_elements: Vec<String>,
    pub form_fields: Vec<String>,
    pub filled_fields: Vec<String>,
    pub errors_visible: Vec<String>,
    pub current_page: String,
    pub step_match: bool,
    pub issues_detected: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouse_position: Option<MousePosition>,
    /// Untouched model text, present only when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
}

impl Analysis {
    /// Fallback analysis for model output that is not valid JSON.
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self {
            current_page: UNPARSED_PAGE.to_string(),
            step_match: false,
            raw_analysis: Some(raw.into()),
            ..Default::default()
        }
    }

    pub fn is_unparsed(&self) -> bool {
        self.raw_analysis.is_some()
    }
}

/// The coaching model's verdict on the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Correct,
    WrongStep,
    HasErrors,
    Incomplete,
    Unknown,
}

impl StepStatus {
    /// Parse a model-supplied status. Anything unrecognised is `Unknown`.
    pub fn from_model(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "correct" => Self::Correct,
            "wrong_step" => Self::WrongStep,
            "has_errors" => Self::HasErrors,
            "incomplete" => Self::Incomplete,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Correct => "correct",
            Self::WrongStep => "wrong_step",
            Self::HasErrors => "has_errors",
            Self::Incomplete => "incomplete",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Short coaching verdict shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    pub step_status: StepStatus,
    pub message: String,
}

impl Guidance {
    /// Build guidance, enforcing the message length cap.
    pub fn new(step_status: StepStatus, message: impl AsRef<str>) -> Self {
        Self {
            step_status,
            message: truncate_message(message.as_ref()),
        }
    }
}

/// Cap a message at [`MAX_GUIDANCE_CHARS`] characters, replacing the tail
/// with `...` when it is cut.
pub fn truncate_message(message: &str) -> String {
    if message.chars().count() <= MAX_GUIDANCE_CHARS {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(MAX_GUIDANCE_CHARS - 3).collect();
    cut.push_str("...");
    cut
}
