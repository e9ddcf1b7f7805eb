//! Step completion gating against an observed screen analysis.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::matcher::{FieldMatcher, SubstringMatcher};
use crate::checklist::Checklist;
use crate::error::ChecklistError;
use crate::relay::Analysis;

/// Derived completion state for one step. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current_step: u32,
    pub total_steps: usize,
    /// All required fields observed and no errors on screen.
    pub step_complete: bool,
    /// Required fields not observed, in definition order.
    pub missing_fields: Vec<String>,
    pub has_errors: bool,
    /// Same value as `step_complete`; kept as a separate field for clients.
    pub can_proceed: bool,
    /// Position through the flow, not how much of the current step is filled.
    pub completion_percentage: f64,
}

/// Evaluates progress with a pluggable field matching strategy.
#[derive(Clone)]
pub struct ProgressEvaluator {
    matcher: Arc<dyn FieldMatcher>,
}

impl ProgressEvaluator {
    pub fn new(matcher: Arc<dyn FieldMatcher>) -> Self {
        Self { matcher }
    }

    /// Evaluate `analysis` against step `current_step` (1-based) of `checklist`.
    pub fn evaluate(
        &self,
        checklist: &Checklist,
        current_step: i64,
        analysis: &Analysis,
    ) -> Result<Progress, ChecklistError> {
        let expected = checklist.step(current_step)?;

        let missing_fields: Vec<String> = expected
            .required_fields
            .iter()
            .filter(|required| !self.matcher.is_satisfied(required, &analysis.filled_fields))
            .cloned()
            .collect();

        let has_errors = !analysis.errors_visible.is_empty();
        let step_complete = missing_fields.is_empty() && !has_errors;
        let total_steps = checklist.total_steps();

        Ok(Progress {
            current_step: expected.id,
            total_steps,
            step_complete,
            missing_fields,
            has_errors,
            can_proceed: step_complete,
            completion_percentage: (f64::from(expected.id) / total_steps as f64) * 100.0,
        })
    }
}

impl Default for ProgressEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(SubstringMatcher))
    }
}

impl std::fmt::Debug for ProgressEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressEvaluator").finish_non_exhaustive()
    }
}

/// Evaluate with the default substring matcher.
pub fn evaluate(
    checklist: &Checklist,
    current_step: i64,
    analysis: &Analysis,
) -> Result<Progress, ChecklistError> {
    ProgressEvaluator::default().evaluate(checklist, current_step, analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{ChecklistRegistry, Step};
    use crate::progress::matcher::ExactMatcher;

    fn signup() -> Checklist {
        Checklist::new(
            "Signup",
            vec![
                Step::new(1, "Open signup"),
                Step::new(2, "Credentials").with_required_fields(&["email", "password"]),
                Step::new(3, "Name").with_required_fields(&["name"]),
                Step::new(4, "Terms"),
                Step::new(5, "Verify"),
                Step::new(6, "Profile"),
                Step::new(7, "Done"),
            ],
        )
    }

    fn analysis(filled: &[&str], errors: &[&str]) -> Analysis {
        Analysis {
            filled_fields: filled.iter().map(|s| s.to_string()).collect(),
            errors_visible: errors.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn substring_match_completes_step() {
        let checklist = Checklist::new(
            "Email",
            vec![Step::new(1, "Email").with_required_fields(&["email"])],
        );
        let progress = evaluate(&checklist, 1, &analysis(&["Work Email"], &[])).unwrap();
        assert!(progress.missing_fields.is_empty());
        assert!(progress.step_complete);
        assert!(progress.can_proceed);
        assert!(!progress.has_errors);
    }

    #[test]
    fn missing_fields_preserve_definition_order() {
        let progress = evaluate(&signup(), 2, &analysis(&["email"], &[])).unwrap();
        assert_eq!(progress.missing_fields, ["password"]);
        assert!(!progress.step_complete);
        assert!(!progress.can_proceed);

        let progress = evaluate(&signup(), 2, &analysis(&[], &[])).unwrap();
        assert_eq!(progress.missing_fields, ["email", "password"]);
    }

    #[test]
    fn visible_errors_block_completion() {
        let progress = evaluate(
            &signup(),
            2,
            &analysis(&["Email", "Password"], &["Password too short"]),
        )
        .unwrap();
        assert!(progress.missing_fields.is_empty());
        assert!(progress.has_errors);
        assert!(!progress.step_complete);
        assert!(!progress.can_proceed);
    }

    #[test]
    fn step_without_requirements_completes_without_errors() {
        let progress = evaluate(&signup(), 1, &Analysis::default()).unwrap();
        assert!(progress.step_complete);
        assert_eq!(progress.current_step, 1);
        assert_eq!(progress.total_steps, 7);
    }

    #[test]
    fn completion_percentage_is_position_based() {
        let progress = evaluate(&signup(), 3, &Analysis::default()).unwrap();
        assert!((progress.completion_percentage - 300.0 / 7.0).abs() < 1e-9);
        // Position-based even though the step's field is missing
        assert!(!progress.step_complete);

        let last = evaluate(&signup(), 7, &Analysis::default()).unwrap();
        assert!((last.completion_percentage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_step_is_invalid() {
        for step in [0, 8, -3] {
            let err = evaluate(&signup(), step, &Analysis::default()).unwrap_err();
            assert!(matches!(err, ChecklistError::InvalidStep { total: 7, .. }));
        }
    }

    #[test]
    fn evaluate_is_pure() {
        let checklist = signup();
        let observed = analysis(&["Last Name"], &[]);
        let first = evaluate(&checklist, 3, &observed).unwrap();
        let second = evaluate(&checklist, 3, &observed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn exact_matcher_can_be_substituted() {
        let strict = ProgressEvaluator::new(Arc::new(ExactMatcher));
        let observed = analysis(&["Last Name"], &[]);
        let progress = strict.evaluate(&signup(), 3, &observed).unwrap();
        assert_eq!(progress.missing_fields, ["name"]);

        // Default substring matcher accepts the same observation
        assert!(evaluate(&signup(), 3, &observed).unwrap().step_complete);
    }

    #[test]
    fn builtin_gcp_bucket_name_step() {
        let registry = ChecklistRegistry::builtin();
        let checklist = registry.get("gcp_storage").unwrap();
        let progress =
            evaluate(checklist, 3, &analysis(&["Bucket_Name: my-bucket"], &[])).unwrap();
        assert!(progress.step_complete);
    }
}
