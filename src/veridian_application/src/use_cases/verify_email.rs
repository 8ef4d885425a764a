use chrono::Utc;
use veridian_core::{
    TokenPurpose, UserStore, UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum VerifyEmailError {
    #[error(transparent)]
    Token(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Verify-email use case - consumes the mailed token and flips the flag
pub struct VerifyEmailUseCase<V, U>
where
    V: VerificationTokenStore,
    U: UserStore,
{
    token_store: V,
    user_store: U,
}

impl<V, U> VerifyEmailUseCase<V, U>
where
    V: VerificationTokenStore,
    U: UserStore,
{
    pub fn new(token_store: V, user_store: U) -> Self {
        Self {
            token_store,
            user_store,
        }
    }

    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip_all)]
    pub async fn execute(&self, token_value: &str) -> Result<(), VerifyEmailError> {
        let consumed = self
            .token_store
            .consume(token_value, TokenPurpose::VerifyEmail, Utc::now())
            .await?;

        self.user_store
            .set_email_verified(&consumed.user_id, true)
            .await?;

        Ok(())
    }
}
