use chrono::{Duration, Utc};
use veridian_core::{
    EmailClient, OneTimeCode, OtpCode, OtpCodeStore, OtpCodeStoreError, RateLimitAction,
    RateLimitError, RateLimiter, SessionState, SessionStore, SessionStoreError, SessionToken,
    UserStore, UserStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum RequestOtpError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session is not awaiting a second factor")]
    SessionNotPending,
    #[error("Two-factor authentication is not enabled")]
    TwoFactorNotEnabled,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("OTP code store error: {0}")]
    OtpCodeStoreError(#[from] OtpCodeStoreError),
}

/// Request-OTP use case - (re)issues the emailed sign-in code for a
/// pending session
pub struct RequestOtpUseCase<S, U, O, E, R>
where
    S: SessionStore,
    U: UserStore,
    O: OtpCodeStore,
    E: EmailClient,
    R: RateLimiter,
{
    session_store: S,
    user_store: U,
    otp_store: O,
    email_client: E,
    rate_limiter: R,
    otp_ttl: Duration,
    otp_max_attempts: u32,
}

impl<S, U, O, E, R> RequestOtpUseCase<S, U, O, E, R>
where
    S: SessionStore,
    U: UserStore,
    O: OtpCodeStore,
    E: EmailClient,
    R: RateLimiter,
{
    pub fn new(
        session_store: S,
        user_store: U,
        otp_store: O,
        email_client: E,
        rate_limiter: R,
        otp_ttl: Duration,
        otp_max_attempts: u32,
    ) -> Self {
        Self {
            session_store,
            user_store,
            otp_store,
            email_client,
            rate_limiter,
            otp_ttl,
            otp_max_attempts,
        }
    }

    /// Issue a fresh code for the pending session, replacing any earlier
    /// unconsumed one. Delivery failure is logged, not surfaced; the code
    /// stands and the client may retry the request.
    #[tracing::instrument(name = "RequestOtpUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &SessionToken) -> Result<(), RequestOtpError> {
        let session = self
            .session_store
            .get(token)
            .await?
            .ok_or(RequestOtpError::SessionNotFound)?;

        if session.is_revoked() || session.is_expired(Utc::now()) {
            return Err(RequestOtpError::SessionNotFound);
        }
        if session.state() != SessionState::PendingTwoFactor {
            return Err(RequestOtpError::SessionNotPending);
        }

        let user = self.user_store.get_user(session.user_id()).await?;
        if !user.two_factor().is_enabled() {
            return Err(RequestOtpError::TwoFactorNotEnabled);
        }

        self.rate_limiter
            .check(&user.id().to_string(), RateLimitAction::OtpRequest)
            .await?;

        let code = OtpCode::random();
        self.otp_store
            .put(OneTimeCode::new(
                *user.id(),
                code.clone(),
                self.otp_ttl,
                self.otp_max_attempts,
            ))
            .await?;

        if let Err(e) = self
            .email_client
            .send_email(user.email(), "Your sign-in code", code.as_str())
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver sign-in code");
        }

        Ok(())
    }
}
