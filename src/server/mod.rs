//! HTTP server relaying prompt templates to the completion service.
//!
//! - [`handler`]: Router construction and the generic prompt handler
//! - [`error`]: Opaque server-error responses

pub mod error;
pub mod handler;

pub use error::ApiError;
pub use handler::{build_router, AppState};
