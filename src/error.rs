//! Error types for the onboarding coach.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Checklist lookup and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("Invalid task type: {0}")]
    UnknownTaskType(String),

    #[error("Invalid step {step}: checklist has {total} steps")]
    InvalidStep { step: i64, total: usize },

    #[error("Checklist {task_type} step at position {position} has id {id}")]
    MisnumberedStep {
        task_type: String,
        position: usize,
        id: u32,
    },

    #[error("Failed to load checklists: {0}")]
    Load(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} is not configured (missing API key)")]
    NotConfigured { provider: String },

    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited")]
    RateLimited { provider: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Request to {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },
}

/// Screenshot intake errors.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("No screenshot provided")]
    Missing,

    #[error("Screenshot is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Screenshot is not a recognised image format")]
    UnknownFormat,
}

/// Console proxy errors.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Invalid upstream URL {url}: {reason}")]
    InvalidUpstream { url: String, reason: String },

    #[error("Failed to read request body: {0}")]
    RequestBody(String),

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}
