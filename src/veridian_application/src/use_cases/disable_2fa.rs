use veridian_core::{Password, TwoFactorStatus, User, UserStore, UserStoreError};

#[derive(Debug, thiserror::Error)]
pub enum Disable2FaError {
    #[error("Invalid password")]
    InvalidPassword,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Disable-2FA use case - password re-verification, then secret and flag
/// are cleared together
pub struct Disable2FaUseCase<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> Disable2FaUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "Disable2FaUseCase::execute", skip_all)]
    pub async fn execute(&self, user: &User, password: Password) -> Result<(), Disable2FaError> {
        self.user_store
            .verify_password(user.id(), &password)
            .await
            .map_err(|e| match e {
                UserStoreError::IncorrectPassword => Disable2FaError::InvalidPassword,
                other => Disable2FaError::UserStoreError(other),
            })?;

        self.user_store
            .set_two_factor(user.id(), TwoFactorStatus::Disabled)
            .await
            .map_err(Disable2FaError::UserStoreError)?;

        Ok(())
    }
}
