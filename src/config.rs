//! Configuration types, read from environment variables at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::llm::gemini::DEFAULT_BASE_URL;
use crate::progress::MatchStrategy;

/// Default upstream for the console proxy.
pub const DEFAULT_PROXY_UPSTREAM: &str = "https://console.cloud.google.com";

/// Coach server configuration.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub port: u16,
    /// Gemini API key. The server still starts without one; model calls fail.
    pub api_key: Option<SecretString>,
    pub vision_model: String,
    pub chat_model: String,
    pub llm_base_url: String,
    /// Upper bound on each model call.
    pub llm_timeout: Duration,
    /// Maximum history records kept; 0 keeps everything.
    pub history_capacity: usize,
    pub field_matching: MatchStrategy,
    /// Extra checklists merged over the built-in ones.
    pub checklists_path: Option<PathBuf>,
    /// Directory for daily rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            port: 5001,
            api_key: None,
            vision_model: "gemini-2.0-flash".to_string(),
            chat_model: "gemini-2.5-pro".to_string(),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(60),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            field_matching: MatchStrategy::default(),
            checklists_path: None,
            log_dir: None,
        }
    }
}

impl CoachConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: parse_or(&var, "COACH_PORT", defaults.port)?,
            api_key: var("GEMINI_API_KEY").map(SecretString::from),
            vision_model: var("COACH_VISION_MODEL").unwrap_or(defaults.vision_model),
            chat_model: var("COACH_CHAT_MODEL").unwrap_or(defaults.chat_model),
            llm_base_url: var("COACH_LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_timeout: Duration::from_secs(parse_or(
                &var,
                "COACH_LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )?),
            history_capacity: parse_or(&var, "COACH_HISTORY_CAPACITY", defaults.history_capacity)?,
            field_matching: parse_or(&var, "COACH_FIELD_MATCHING", defaults.field_matching)?,
            checklists_path: var("COACH_CHECKLISTS_PATH").map(PathBuf::from),
            log_dir: var("COACH_LOG_DIR").map(PathBuf::from),
        })
    }
}

/// Console proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    /// Base URL every request is forwarded to.
    pub upstream: String,
    /// Domain written into rewritten `Set-Cookie` headers.
    pub cookie_domain: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: 8082,
            upstream: DEFAULT_PROXY_UPSTREAM.to_string(),
            cookie_domain: "localhost".to_string(),
            log_dir: None,
        }
    }
}

impl ProxyConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: parse_or(&var, "PROXY_PORT", defaults.port)?,
            upstream: var("PROXY_UPSTREAM")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream),
            cookie_domain: var("PROXY_COOKIE_DOMAIN").unwrap_or(defaults.cookie_domain),
            log_dir: var("PROXY_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
