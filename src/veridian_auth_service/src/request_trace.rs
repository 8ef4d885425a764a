//! Span and event hooks for the HTTP trace layer. Every request gets a
//! fresh id so its log lines can be correlated.

use std::time::Duration;

use axum::{body::Body, http::Request, response::Response};
use tracing::Span;
use uuid::Uuid;

pub fn make_span_with_request_id(request: &Request<Body>) -> Span {
    let request_id = Uuid::new_v4();
    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
    )
}

pub fn on_request(_request: &Request<Body>, _span: &Span) {
    tracing::info!("request received");
}

pub fn on_response(response: &Response, latency: Duration, _span: &Span) {
    tracing::info!(
        status = %response.status(),
        latency_ms = latency.as_millis() as u64,
        "response sent"
    );
}
