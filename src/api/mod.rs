//! Coach HTTP API.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{AppState, coach_routes};
