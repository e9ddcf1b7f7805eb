//! Strategies for matching required fields against observed filled fields.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Decides whether a required field is satisfied by the fields the vision
/// model reported as filled.
pub trait FieldMatcher: Send + Sync {
    fn is_satisfied(&self, required: &str, filled: &[String]) -> bool;
}

/// Case-insensitive substring containment: `"email"` is satisfied by
/// `"Work Email"`.
///
/// Tolerates phrasing differences in model output at the cost of false
/// positives (`"name"` is satisfied by `"Last name"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl FieldMatcher for SubstringMatcher {
    fn is_satisfied(&self, required: &str, filled: &[String]) -> bool {
        let required = required.to_lowercase();
        filled
            .iter()
            .any(|field| field.to_lowercase().contains(&required))
    }
}

/// Case-insensitive equality after trimming.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl FieldMatcher for ExactMatcher {
    fn is_satisfied(&self, required: &str, filled: &[String]) -> bool {
        let required = required.trim().to_lowercase();
        filled
            .iter()
            .any(|field| field.trim().to_lowercase() == required)
    }
}

/// Configurable choice of [`FieldMatcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    #[default]
    Substring,
    Exact,
}

impl MatchStrategy {
    pub fn matcher(self) -> Arc<dyn FieldMatcher> {
        match self {
            Self::Substring => Arc::new(SubstringMatcher),
            Self::Exact => Arc::new(ExactMatcher),
        }
    }
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "exact" => Ok(Self::Exact),
            other => Err(format!("unknown match strategy '{other}' (expected substring or exact)")),
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Exact => write!(f, "exact"),
        }
    }
}
