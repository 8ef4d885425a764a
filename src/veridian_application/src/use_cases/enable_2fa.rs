use veridian_core::{
    Password, TotpError, TotpVerifier, TwoFactorEnrollment, TwoFactorStatus, User, UserStore,
    UserStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum Enable2FaError {
    /// Fresh proof of the password is required so a hijacked session
    /// cannot silently lock the owner out behind 2FA.
    #[error("Invalid password")]
    InvalidPassword,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("TOTP error: {0}")]
    TotpError(#[from] TotpError),
}

/// Enable-2FA use case - password re-verification, secret generation,
/// provisioning payload
pub struct Enable2FaUseCase<U, T>
where
    U: UserStore,
    T: TotpVerifier,
{
    user_store: U,
    totp: T,
}

impl<U, T> Enable2FaUseCase<U, T>
where
    U: UserStore,
    T: TotpVerifier,
{
    pub fn new(user_store: U, totp: T) -> Self {
        Self { user_store, totp }
    }

    /// Returns the enrollment payload (base32 secret and otpauth URI) for
    /// the caller to present; rendering a QR image from it is not this
    /// layer's concern.
    #[tracing::instrument(name = "Enable2FaUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        user: &User,
        password: Password,
    ) -> Result<TwoFactorEnrollment, Enable2FaError> {
        self.user_store
            .verify_password(user.id(), &password)
            .await
            .map_err(|e| match e {
                UserStoreError::IncorrectPassword => Enable2FaError::InvalidPassword,
                other => Enable2FaError::UserStoreError(other),
            })?;

        let enrollment = self.totp.generate_enrollment(user.email())?;
        self.user_store
            .set_two_factor(
                user.id(),
                TwoFactorStatus::Enabled {
                    secret: enrollment.secret_base32.clone(),
                },
            )
            .await
            .map_err(Enable2FaError::UserStoreError)?;

        Ok(enrollment)
    }
}
