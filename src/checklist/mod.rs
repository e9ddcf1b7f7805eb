//! Checklist registry: the onboarding flows the coach walks users through.
//!
//! A checklist is an ordered list of steps. Each step names the form fields
//! that must be observed as filled before the user may move on. Checklists
//! are loaded once at startup into an immutable [`ChecklistRegistry`] that
//! handlers share by reference.

pub mod builtin;
pub mod model;
pub mod registry;

pub use model::{Checklist, Step};
pub use registry::ChecklistRegistry;
