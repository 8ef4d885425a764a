use chrono::Utc;
use veridian_core::{
    RateLimitAction, RateLimitError, RateLimiter, Session, SessionState, SessionStore,
    SessionStoreError, SessionToken, TotpError, TotpVerifier, TwoFactorStatus, UserStore,
    UserStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum VerifyTotpError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Session is not awaiting a second factor")]
    SessionNotPending,
    #[error("Two-factor authentication is not enabled")]
    TwoFactorNotEnabled,
    #[error("Invalid authenticator code")]
    InvalidCode,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("TOTP error: {0}")]
    TotpError(#[from] TotpError),
}

/// Verify-TOTP use case - completes a pending session with an
/// authenticator-app code instead of the emailed one
pub struct VerifyTotpUseCase<S, U, T, R>
where
    S: SessionStore,
    U: UserStore,
    T: TotpVerifier,
    R: RateLimiter,
{
    session_store: S,
    user_store: U,
    totp: T,
    rate_limiter: R,
}

impl<S, U, T, R> VerifyTotpUseCase<S, U, T, R>
where
    S: SessionStore,
    U: UserStore,
    T: TotpVerifier,
    R: RateLimiter,
{
    pub fn new(session_store: S, user_store: U, totp: T, rate_limiter: R) -> Self {
        Self {
            session_store,
            user_store,
            totp,
            rate_limiter,
        }
    }

    #[tracing::instrument(name = "VerifyTotpUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        token: &SessionToken,
        code: &str,
    ) -> Result<Session, VerifyTotpError> {
        let session = self
            .session_store
            .get(token)
            .await?
            .ok_or(VerifyTotpError::SessionNotFound)?;

        if session.is_revoked() || session.is_expired(Utc::now()) {
            return Err(VerifyTotpError::SessionNotFound);
        }
        if session.state() != SessionState::PendingTwoFactor {
            return Err(VerifyTotpError::SessionNotPending);
        }

        self.rate_limiter
            .check(&session.user_id().to_string(), RateLimitAction::OtpVerify)
            .await?;

        let user = self.user_store.get_user(session.user_id()).await?;
        let secret = match user.two_factor() {
            TwoFactorStatus::Enabled { secret } => secret,
            TwoFactorStatus::Disabled => return Err(VerifyTotpError::TwoFactorNotEnabled),
        };

        if !self.totp.check(secret, code)? {
            return Err(VerifyTotpError::InvalidCode);
        }

        let promoted = self.session_store.promote(token).await?;
        Ok(promoted)
    }
}
