//! Service assembly for the Veridian authentication core.
//!
//! Builds the router from `veridian_axum` handlers, layers request
//! tracing and CORS on top, and wires the production Postgres/Redis
//! adapters. Integration tests spawn the same service on in-memory
//! stores.

pub mod auth_service;
pub mod helpers;
pub mod request_trace;

pub use auth_service::AuthService;
