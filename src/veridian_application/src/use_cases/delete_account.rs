use chrono::{Duration, Utc};
use veridian_core::{
    EmailClient, SessionStore, SessionStoreError, TokenPurpose, User, UserStore, UserStoreError,
    VerificationToken, VerificationTokenStore, VerificationTokenStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum RequestAccountDeletionError {
    #[error("Verification token store error: {0}")]
    TokenStoreError(#[from] VerificationTokenStoreError),
}

/// Request-account-deletion use case - deletion is armed by email, not
/// applied, so a hijacked session alone cannot destroy the account
pub struct RequestAccountDeletionUseCase<V, E>
where
    V: VerificationTokenStore,
    E: EmailClient,
{
    token_store: V,
    email_client: E,
    deletion_ttl: Duration,
}

impl<V, E> RequestAccountDeletionUseCase<V, E>
where
    V: VerificationTokenStore,
    E: EmailClient,
{
    pub fn new(token_store: V, email_client: E, deletion_ttl: Duration) -> Self {
        Self {
            token_store,
            email_client,
            deletion_ttl,
        }
    }

    #[tracing::instrument(name = "RequestAccountDeletionUseCase::execute", skip_all)]
    pub async fn execute(&self, user: &User) -> Result<(), RequestAccountDeletionError> {
        let token = VerificationToken::new(
            *user.id(),
            TokenPurpose::DeleteAccount,
            None,
            self.deletion_ttl,
        );
        let token_value = token.value().to_string();
        self.token_store.insert(token).await?;

        if let Err(e) = self
            .email_client
            .send_email(
                user.email(),
                "Confirm account deletion",
                &format!("Your account deletion token: {token_value}"),
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver account deletion confirmation");
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfirmAccountDeletionError {
    #[error(transparent)]
    Token(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Confirm-account-deletion use case - consumes the token, removes the
/// account, and revokes every session it had
pub struct ConfirmAccountDeletionUseCase<V, U, S>
where
    V: VerificationTokenStore,
    U: UserStore,
    S: SessionStore,
{
    token_store: V,
    user_store: U,
    session_store: S,
}

impl<V, U, S> ConfirmAccountDeletionUseCase<V, U, S>
where
    V: VerificationTokenStore,
    U: UserStore,
    S: SessionStore,
{
    pub fn new(token_store: V, user_store: U, session_store: S) -> Self {
        Self {
            token_store,
            user_store,
            session_store,
        }
    }

    #[tracing::instrument(name = "ConfirmAccountDeletionUseCase::execute", skip_all)]
    pub async fn execute(&self, token_value: &str) -> Result<(), ConfirmAccountDeletionError> {
        let consumed = self
            .token_store
            .consume(token_value, TokenPurpose::DeleteAccount, Utc::now())
            .await?;

        self.user_store.delete_user(&consumed.user_id).await?;
        self.session_store
            .revoke_all_for_user(&consumed.user_id, None)
            .await?;

        Ok(())
    }
}
