use std::sync::Arc;

use chrono::Duration;
use veridian_core::{
    EmailClient, OtpCodeStore, RateLimiter, SessionStore, TotpVerifier, UserStore,
    VerificationTokenStore,
};

/// Shared handler state. Every port is held as an `Arc<dyn Trait>` so
/// the same router wiring serves in-memory stores in tests and
/// Postgres/Redis in production.
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub session_store: Arc<dyn SessionStore>,
    pub otp_store: Arc<dyn OtpCodeStore>,
    pub token_store: Arc<dyn VerificationTokenStore>,
    pub email_client: Arc<dyn EmailClient>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub totp: Arc<dyn TotpVerifier>,
    pub policy: AuthPolicy,
}

/// Durations and switches the handlers thread into the use cases.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub session_ttl: Duration,
    pub pending_session_ttl: Duration,
    pub otp_ttl: Duration,
    pub otp_max_attempts: u32,
    pub verify_email_ttl: Duration,
    pub reset_password_ttl: Duration,
    pub change_email_ttl: Duration,
    pub delete_account_ttl: Duration,
    pub revoke_sessions_on_password_change: bool,
}

impl AuthPolicy {
    /// Policy derived from the loaded service settings.
    pub fn from_settings(settings: &veridian_adapters::config::AuthServiceSetting) -> Self {
        Self {
            session_ttl: Duration::minutes(settings.session.ttl_minutes),
            pending_session_ttl: Duration::minutes(settings.session.pending_ttl_minutes),
            otp_ttl: Duration::minutes(settings.otp.ttl_minutes),
            otp_max_attempts: settings.otp.max_attempts,
            verify_email_ttl: Duration::hours(settings.verification.verify_email_ttl_hours),
            reset_password_ttl: Duration::minutes(
                settings.verification.reset_password_ttl_minutes,
            ),
            change_email_ttl: Duration::hours(settings.verification.change_email_ttl_hours),
            delete_account_ttl: Duration::hours(settings.verification.delete_account_ttl_hours),
            revoke_sessions_on_password_change: settings.session.revoke_on_password_change,
        }
    }
}
