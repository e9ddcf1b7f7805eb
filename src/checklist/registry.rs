//! Immutable checklist registry built once at startup.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use super::builtin::builtin_checklists;
use super::model::Checklist;
use crate::error::ChecklistError;

/// Read-only table of checklists keyed by task type.
///
/// Built at startup and shared behind an `Arc`; there is no mutation API.
#[derive(Debug, Clone, Default)]
pub struct ChecklistRegistry {
    checklists: BTreeMap<String, Checklist>,
}

impl ChecklistRegistry {
    /// Registry holding only the built-in flows.
    pub fn builtin() -> Self {
        let checklists = builtin_checklists()
            .into_iter()
            .map(|(task_type, checklist)| (task_type.to_string(), checklist))
            .collect();
        Self { checklists }
    }

    /// Build a registry from explicit definitions, validating step numbering.
    pub fn from_checklists<I, K>(checklists: I) -> Result<Self, ChecklistError>
    where
        I: IntoIterator<Item = (K, Checklist)>,
        K: Into<String>,
    {
        let mut registry = Self::default();
        for (task_type, checklist) in checklists {
            registry.insert(task_type.into(), checklist)?;
        }
        Ok(registry)
    }

    /// Extend the registry with checklists from a JSON file.
    ///
    /// The file holds an object of task type → checklist. Entries override
    /// existing checklists with the same task type.
    pub fn load_file(mut self, path: &Path) -> Result<Self, ChecklistError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ChecklistError::Load(format!("{}: {}", path.display(), e)))?;
        let parsed: BTreeMap<String, Checklist> = serde_json::from_str(&raw)
            .map_err(|e| ChecklistError::Load(format!("{}: {}", path.display(), e)))?;

        let count = parsed.len();
        for (task_type, checklist) in parsed {
            self.insert(task_type, checklist)?;
        }
        info!(path = %path.display(), count, "Loaded checklists from file");
        Ok(self)
    }

    fn insert(&mut self, task_type: String, checklist: Checklist) -> Result<(), ChecklistError> {
        checklist.validate(&task_type)?;
        self.checklists.insert(task_type, checklist);
        Ok(())
    }

    /// Look up the checklist for a task type.
    pub fn get(&self, task_type: &str) -> Result<&Checklist, ChecklistError> {
        self.checklists
            .get(task_type)
            .ok_or_else(|| ChecklistError::UnknownTaskType(task_type.to_string()))
    }

    /// Registered task types in sorted order.
    pub fn task_types(&self) -> impl Iterator<Item = &str> {
        self.checklists.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.checklists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checklists.is_empty()
    }
}
