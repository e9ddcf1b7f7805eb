//! Progress evaluation: decides whether the current checklist step is done.

pub mod evaluator;
pub mod matcher;

pub use evaluator::{Progress, ProgressEvaluator, evaluate};
pub use matcher::{ExactMatcher, FieldMatcher, MatchStrategy, SubstringMatcher};
