use chrono::Duration;
use veridian_core::{
    Email, EmailClient, Password, TokenPurpose, User, UserStore, UserStoreError,
    VerificationToken, VerificationTokenStore, VerificationTokenStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Verification token store error: {0}")]
    TokenStoreError(#[from] VerificationTokenStoreError),
}

/// Signup use case - registration plus the email-verification kickoff
pub struct SignupUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    user_store: U,
    token_store: V,
    email_client: E,
    verification_ttl: Duration,
}

impl<U, V, E> SignupUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient,
{
    pub fn new(user_store: U, token_store: V, email_client: E, verification_ttl: Duration) -> Self {
        Self {
            user_store,
            token_store,
            email_client,
            verification_ttl,
        }
    }

    /// Create the account and send the verification link. A failed send is
    /// logged but does not undo the registration; the token stays valid
    /// for a resend.
    #[tracing::instrument(name = "SignupUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        name: String,
    ) -> Result<User, SignupError> {
        let user = User::new(email, name);
        self.user_store.add_user(user.clone(), password).await?;

        let token = VerificationToken::new(
            *user.id(),
            TokenPurpose::VerifyEmail,
            None,
            self.verification_ttl,
        );
        let token_value = token.value().to_string();
        self.token_store.insert(token).await?;

        if let Err(e) = self
            .email_client
            .send_email(
                user.email(),
                "Verify your email",
                &format!("Your email verification token: {token_value}"),
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver verification email");
        }

        Ok(user)
    }
}
