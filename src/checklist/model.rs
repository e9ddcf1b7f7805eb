//! Checklist and step data models.

use serde::{Deserialize, Serialize};

use crate::error::ChecklistError;

/// One unit of an onboarding checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position of the step within its checklist.
    pub id: u32,
    pub description: String,
    /// Words the screen is likely to show during this step. Advisory only,
    /// never used for completion checks.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Field names that must appear filled before the step counts as done.
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl Step {
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            keywords: Vec::new(),
            required_fields: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_required_fields(mut self, fields: &[&str]) -> Self {
        self.required_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// A named, ordered onboarding flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Checklist {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    /// Look up a step by its 1-based position.
    ///
    /// Positions outside `1..=total_steps()` are an `InvalidStep` error.
    pub fn step(&self, position: i64) -> Result<&Step, ChecklistError> {
        let invalid = || ChecklistError::InvalidStep {
            step: position,
            total: self.steps.len(),
        };
        let index = usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .ok_or_else(invalid)?;
        self.steps.get(index).ok_or_else(invalid)
    }

    /// Check that every step's id matches its 1-based position.
    pub fn validate(&self, task_type: &str) -> Result<(), ChecklistError> {
        for (index, step) in self.steps.iter().enumerate() {
            let position = index + 1;
            if usize::try_from(step.id).ok() != Some(position) {
                return Err(ChecklistError::MisnumberedStep {
                    task_type: task_type.to_string(),
                    position,
                    id: step.id,
                });
            }
        }
        Ok(())
    }
}
