//! Axum boundary for the Veridian authentication core.
//!
//! Thin HTTP handlers that parse requests into domain types, run the
//! use cases from `veridian_application`, and translate results into
//! responses and session cookies. All policy lives below this layer.

pub mod routes;
pub mod state;

pub use routes::error::{AuthApiError, ErrorResponse};
pub use state::AppState;
