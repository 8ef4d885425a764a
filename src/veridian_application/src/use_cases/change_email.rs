use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use veridian_core::{
    Email, EmailClient, EmailError, TokenPurpose, User, UserStore, UserStoreError,
    VerificationToken, VerificationTokenStore, VerificationTokenStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum RequestEmailChangeError {
    #[error("An account with that email already exists")]
    EmailTaken,
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Verification token store error: {0}")]
    TokenStoreError(#[from] VerificationTokenStoreError),
}

/// Request-email-change use case
///
/// The confirmation goes to the NEW address; proving control of the
/// destination is the whole point of the token.
pub struct RequestEmailChangeUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    user_store: U,
    token_store: V,
    email_client: E,
    change_ttl: Duration,
}

impl<U, V, E> RequestEmailChangeUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    pub fn new(user_store: U, token_store: V, email_client: E, change_ttl: Duration) -> Self {
        Self {
            user_store,
            token_store,
            email_client,
            change_ttl,
        }
    }

    #[tracing::instrument(name = "RequestEmailChangeUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        user: &User,
        new_email: Email,
    ) -> Result<(), RequestEmailChangeError> {
        if self.user_store.find_by_email(&new_email).await?.is_some() {
            return Err(RequestEmailChangeError::EmailTaken);
        }

        let token = VerificationToken::new(
            *user.id(),
            TokenPurpose::ChangeEmail,
            Some(new_email.as_ref().expose_secret().clone()),
            self.change_ttl,
        );
        let token_value = token.value().to_string();
        self.token_store.insert(token).await?;

        if let Err(e) = self
            .email_client
            .send_email(
                &new_email,
                "Confirm your new email",
                &format!("Your email change token: {token_value}"),
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver email change confirmation");
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfirmEmailChangeError {
    #[error(transparent)]
    Token(#[from] VerificationTokenStoreError),
    #[error("Token carries no destination address")]
    MissingPayload,
    #[error("Token payload is not a valid email: {0}")]
    InvalidPayload(#[from] EmailError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Confirm-email-change use case - consumes the token and applies the
/// address it carries
pub struct ConfirmEmailChangeUseCase<V, U>
where
    V: VerificationTokenStore,
    U: UserStore,
{
    token_store: V,
    user_store: U,
}

impl<V, U> ConfirmEmailChangeUseCase<V, U>
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

    /// The new address is taken from the token payload, never from the
    /// request, so the applied address is exactly the one that was proven.
    /// Consuming the token also counts as verifying the address.
    #[tracing::instrument(name = "ConfirmEmailChangeUseCase::execute", skip_all)]
    pub async fn execute(&self, token_value: &str) -> Result<(), ConfirmEmailChangeError> {
        let consumed = self
            .token_store
            .consume(token_value, TokenPurpose::ChangeEmail, Utc::now())
            .await?;

        let raw = consumed
            .payload
            .ok_or(ConfirmEmailChangeError::MissingPayload)?;
        let new_email = Email::try_from(Secret::from(raw))?;

        self.user_store
            .update_email(&consumed.user_id, new_email)
            .await?;
        self.user_store
            .set_email_verified(&consumed.user_id, true)
            .await?;

        Ok(())
    }
}
