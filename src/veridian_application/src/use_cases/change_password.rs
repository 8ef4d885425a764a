use veridian_core::{
    Password, SessionStore, SessionStoreError, SessionToken, User, UserStore, UserStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Invalid password")]
    InvalidPassword,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
}

/// Change-password use case - current-password proof, then an optional
/// sweep of the user's other sessions
pub struct ChangePasswordUseCase<U, S>
where
    U: UserStore,
    S: SessionStore,
{
    user_store: U,
    session_store: S,
    revoke_other_sessions: bool,
}

impl<U, S> ChangePasswordUseCase<U, S>
where
    U: UserStore,
    S: SessionStore,
{
    pub fn new(user_store: U, session_store: S, revoke_other_sessions: bool) -> Self {
        Self {
            user_store,
            session_store,
            revoke_other_sessions,
        }
    }

    /// The calling session is spared from the revocation sweep so the
    /// user is not logged out by their own password change.
    #[tracing::instrument(name = "ChangePasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        user: &User,
        current_session: &SessionToken,
        current_password: Password,
        new_password: Password,
    ) -> Result<(), ChangePasswordError> {
        self.user_store
            .verify_password(user.id(), &current_password)
            .await
            .map_err(|e| match e {
                UserStoreError::IncorrectPassword => ChangePasswordError::InvalidPassword,
                other => ChangePasswordError::UserStoreError(other),
            })?;

        self.user_store
            .set_new_password(user.id(), new_password)
            .await
            .map_err(ChangePasswordError::UserStoreError)?;

        if self.revoke_other_sessions {
            self.session_store
                .revoke_all_for_user(user.id(), Some(current_session))
                .await?;
        }

        Ok(())
    }
}
