use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use veridian_adapters::config::AllowedOrigins;
use veridian_axum::{
    AppState,
    routes::{
        change_password, confirm_account_deletion, confirm_email_change, current_session,
        disable_two_factor, enable_two_factor, login, logout, request_account_deletion,
        request_email_change, request_otp, request_password_reset, reset_password, signup,
        verify_email, verify_otp, verify_totp,
    },
};

use crate::request_trace::{make_span_with_request_id, on_request, on_response};

/// The assembled authentication service. Wraps the router so callers
/// can either run it standalone or nest it under another application.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Build the router over the given state. The state decides which
    /// adapters back the service; the routes are the same either way.
    pub fn new(state: AppState) -> Self {
        let router = Router::new()
            .route("/signup", post(signup))
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/session", get(current_session))
            .route("/otp/request", post(request_otp))
            .route("/otp/verify", post(verify_otp))
            .route("/2fa/enable", post(enable_two_factor))
            .route("/2fa/disable", post(disable_two_factor))
            .route("/2fa/verify-totp", post(verify_totp))
            .route("/verify-email", post(verify_email))
            .route("/password/reset-request", post(request_password_reset))
            .route("/password/reset", post(reset_password))
            .route("/password/change", post(change_password))
            .route("/email/change-request", post(request_email_change))
            .route("/email/change", post(confirm_email_change))
            .route("/account/delete-request", post(request_account_deletion))
            .route("/account", delete(confirm_account_deletion))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert into a router that can be mounted on another application.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}
