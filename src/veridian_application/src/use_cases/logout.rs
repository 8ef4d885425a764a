use veridian_core::{SessionStore, SessionStoreError, SessionToken};

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Logout use case - session revocation
pub struct LogoutUseCase<S>
where
    S: SessionStore,
{
    session_store: S,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(session_store: S) -> Self {
        Self { session_store }
    }

    /// Revoke the session. Idempotent: revoking an unknown or already
    /// revoked token succeeds with the same observable state.
    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &SessionToken) -> Result<(), LogoutError> {
        self.session_store.revoke(token).await?;
        Ok(())
    }
}
