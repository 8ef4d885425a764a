use chrono::Utc;
use veridian_core::{
    SessionState, SessionStore, SessionStoreError, SessionToken, User, UserStore, UserStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum ValidateSessionError {
    #[error("Session not found")]
    NotFound,
    #[error("Session has been revoked")]
    Revoked,
    #[error("Session has expired")]
    Expired,
    #[error("Second factor verification outstanding")]
    PendingTwoFactor,
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Validate-session use case - resolves a token to its user
///
/// A pending-second-factor session is rejected here; only the OTP/TOTP
/// completion endpoints accept one.
pub struct ValidateSessionUseCase<S, U>
where
    S: SessionStore,
    U: UserStore,
{
    session_store: S,
    user_store: U,
}

impl<S, U> ValidateSessionUseCase<S, U>
where
    S: SessionStore,
    U: UserStore,
{
    pub fn new(session_store: S, user_store: U) -> Self {
        Self {
            session_store,
            user_store,
        }
    }

    #[tracing::instrument(name = "ValidateSessionUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &SessionToken) -> Result<User, ValidateSessionError> {
        let session = self
            .session_store
            .get(token)
            .await?
            .ok_or(ValidateSessionError::NotFound)?;

        if session.is_revoked() {
            return Err(ValidateSessionError::Revoked);
        }
        if session.is_expired(Utc::now()) {
            return Err(ValidateSessionError::Expired);
        }
        if session.state() == SessionState::PendingTwoFactor {
            return Err(ValidateSessionError::PendingTwoFactor);
        }

        self.user_store
            .get_user(session.user_id())
            .await
            .map_err(|e| match e {
                // The account is gone; the session is as good as revoked.
                UserStoreError::UserNotFound => ValidateSessionError::NotFound,
                other => ValidateSessionError::UnexpectedError(other.to_string()),
            })
    }
}
