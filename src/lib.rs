//! Onboarding Coach: screen-aware step-by-step guidance for SaaS setup flows.

pub mod api;
pub mod checklist;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod logging;
pub mod progress;
pub mod proxy;
pub mod relay;
