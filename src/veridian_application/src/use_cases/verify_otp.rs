use chrono::Utc;
use veridian_core::{
    OtpCode, OtpCodeStore, OtpCodeStoreError, RateLimitAction, RateLimitError, RateLimiter,
    Session, SessionState, SessionStore, SessionStoreError, SessionToken,
};

#[derive(Debug, thiserror::Error)]
pub enum VerifyOtpError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session is not awaiting a second factor")]
    SessionNotPending,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error(transparent)]
    Otp(#[from] OtpCodeStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Verify-OTP use case - consumes the emailed code and promotes the
/// pending session
pub struct VerifyOtpUseCase<S, O, R>
where
    S: SessionStore,
    O: OtpCodeStore,
    R: RateLimiter,
{
    session_store: S,
    otp_store: O,
    rate_limiter: R,
}

impl<S, O, R> VerifyOtpUseCase<S, O, R>
where
    S: SessionStore,
    O: OtpCodeStore,
    R: RateLimiter,
{
    pub fn new(session_store: S, otp_store: O, rate_limiter: R) -> Self {
        Self {
            session_store,
            otp_store,
            rate_limiter,
        }
    }

    /// The consume is atomic in the store: of two racing submissions of
    /// the same correct code, exactly one reaches the promote step.
    #[tracing::instrument(name = "VerifyOtpUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        token: &SessionToken,
        submitted: OtpCode,
    ) -> Result<Session, VerifyOtpError> {
        let session = self
            .session_store
            .get(token)
            .await?
            .ok_or(VerifyOtpError::SessionNotFound)?;

        if session.is_revoked() || session.is_expired(Utc::now()) {
            return Err(VerifyOtpError::SessionNotFound);
        }
        if session.state() != SessionState::PendingTwoFactor {
            return Err(VerifyOtpError::SessionNotPending);
        }

        self.rate_limiter
            .check(&session.user_id().to_string(), RateLimitAction::OtpVerify)
            .await?;

        self.otp_store
            .consume(session.user_id(), &submitted, Utc::now())
            .await?;

        let promoted = self.session_store.promote(token).await?;
        Ok(promoted)
    }
}
