use chrono::{Duration, Utc};
use secrecy::ExposeSecret;
use veridian_core::{
    Email, EmailClient, EmailClientError, Password, RateLimitAction, RateLimitError, RateLimiter,
    SessionStore, SessionStoreError, TokenPurpose, UserStore, UserStoreError, VerificationToken,
    VerificationTokenStore, VerificationTokenStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum RequestPasswordResetError {
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("Verification token store error: {0}")]
    TokenStoreError(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Failed to deliver reset email: {0}")]
    DeliveryError(#[from] EmailClientError),
}

/// Request-password-reset use case
///
/// The response is identical whether or not the address has an account,
/// so the endpoint cannot be used to enumerate users.
pub struct RequestPasswordResetUseCase<U, V, E, R>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
    R: RateLimiter,
{
    user_store: U,
    token_store: V,
    email_client: E,
    rate_limiter: R,
    reset_ttl: Duration,
}

impl<U, V, E, R> RequestPasswordResetUseCase<U, V, E, R>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
    R: RateLimiter,
{
    pub fn new(
        user_store: U,
        token_store: V,
        email_client: E,
        rate_limiter: R,
        reset_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            token_store,
            email_client,
            rate_limiter,
            reset_ttl,
        }
    }

    /// Unlike the OTP and verification mails, reset delivery is mandatory:
    /// the user has no session to fall back on. One retry, then the error
    /// surfaces. The token stays valid either way.
    #[tracing::instrument(name = "RequestPasswordResetUseCase::execute", skip_all)]
    pub async fn execute(&self, email: &Email) -> Result<(), RequestPasswordResetError> {
        self.rate_limiter
            .check(email.as_ref().expose_secret(), RateLimitAction::PasswordReset)
            .await?;

        let user = match self.user_store.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => return Ok(()),
            Err(e) => return Err(RequestPasswordResetError::UserStoreError(e)),
        };

        let token = VerificationToken::new(
            *user.id(),
            TokenPurpose::ResetPassword,
            None,
            self.reset_ttl,
        );
        let token_value = token.value().to_string();
        self.token_store.insert(token).await?;

        let content = format!("Your password reset token: {token_value}");
        if let Err(first) = self
            .email_client
            .send_email(user.email(), "Reset your password", &content)
            .await
        {
            tracing::warn!(error = %first, "Reset email delivery failed, retrying once");
            self.email_client
                .send_email(user.email(), "Reset your password", &content)
                .await?;
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error(transparent)]
    Token(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Reset-password use case - consumes the reset token, replaces the
/// password, and revokes every session of the account
pub struct ResetPasswordUseCase<V, U, S>
where
    V: VerificationTokenStore,
    U: UserStore,
    S: SessionStore,
{
    token_store: V,
    user_store: U,
    session_store: S,
}

impl<V, U, S> ResetPasswordUseCase<V, U, S>
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

    /// All sessions go, none spared. Whoever requested the reset was not
    /// signed in, so anything live might belong to an attacker.
    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        token_value: &str,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let consumed = self
            .token_store
            .consume(token_value, TokenPurpose::ResetPassword, Utc::now())
            .await?;

        self.user_store
            .set_new_password(&consumed.user_id, new_password)
            .await?;
        self.session_store
            .revoke_all_for_user(&consumed.user_id, None)
            .await?;

        Ok(())
    }
}
