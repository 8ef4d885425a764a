use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    otp_code::{OneTimeCode, OtpCode, OtpVerifyError},
    password::Password,
    session::{Session, SessionToken},
    user::{TwoFactorStatus, User, UserId},
    verification::{TokenConsumeError, TokenPurpose, VerificationToken},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::IncorrectPassword, Self::IncorrectPassword)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Credential store. All writes are atomic per user record; password
/// material never leaves the store unhashed.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError>;
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError>;
    /// Verify credentials. A missing user and a wrong password are
    /// indistinguishable to the caller; implementations must equalize the
    /// two paths in timing as well.
    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError>;
    /// Re-verify the current password of a known user, for operations that
    /// demand fresh proof (password change, 2FA enable/disable).
    async fn verify_password(&self, id: &UserId, password: &Password)
    -> Result<(), UserStoreError>;
    async fn set_new_password(
        &self,
        id: &UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError>;
    async fn set_email_verified(&self, id: &UserId, verified: bool) -> Result<(), UserStoreError>;
    async fn set_two_factor(
        &self,
        id: &UserId,
        status: TwoFactorStatus,
    ) -> Result<(), UserStoreError>;
    async fn update_email(&self, id: &UserId, email: Email) -> Result<(), UserStoreError>;
    async fn delete_user(&self, id: &UserId) -> Result<(), UserStoreError>;
}

// SessionStore port trait and errors
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session not found")]
    NotFound,
    #[error("Session is not pending a second factor")]
    NotPending,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError>;
    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError>;
    /// Atomically clear the pending-second-factor marker. Fails with
    /// `NotPending` when the session is already active or revoked, so two
    /// racing verifications cannot both observe a pending session.
    async fn promote(&self, token: &SessionToken) -> Result<Session, SessionStoreError>;
    /// Mark revoked. Idempotent: revoking an unknown or already revoked
    /// token succeeds.
    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionToken>,
    ) -> Result<(), SessionStoreError>;
}

// OtpCodeStore port trait and errors
#[derive(Debug, Error)]
pub enum OtpCodeStoreError {
    #[error("No outstanding code for user")]
    NotFound,
    #[error(transparent)]
    Invalid(#[from] OtpVerifyError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

#[async_trait]
pub trait OtpCodeStore: Send + Sync {
    /// Store a fresh code, replacing any prior unconsumed code for the
    /// same user (at most one live code per user).
    async fn put(&self, code: OneTimeCode) -> Result<(), OtpCodeStoreError>;
    /// Atomic check-and-consume. The verify/attempt-counter update happens
    /// under the record's lock, so two concurrent submissions of the same
    /// correct code resolve to exactly one success.
    async fn consume(
        &self,
        user_id: &UserId,
        submitted: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<(), OtpCodeStoreError>;
}

// VerificationTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum VerificationTokenStoreError {
    #[error("Token not found")]
    NotFound,
    #[error(transparent)]
    Invalid(#[from] TokenConsumeError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Owner and payload recovered from a successfully consumed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedToken {
    pub user_id: UserId,
    pub payload: Option<String>,
}

#[async_trait]
pub trait VerificationTokenStore: Send + Sync {
    async fn insert(&self, token: VerificationToken) -> Result<(), VerificationTokenStoreError>;
    /// Atomically consume a token for `purpose`. The single-use flip
    /// happens under the record's lock.
    async fn consume(
        &self,
        value: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<ConsumedToken, VerificationTokenStoreError>;
}

// Delegating impls so `Arc<dyn Store>` satisfies the port bounds the use
// cases take.
#[async_trait]
impl<T: UserStore + ?Sized> UserStore for std::sync::Arc<T> {
    async fn add_user(&self, user: User, password: Password) -> Result<(), UserStoreError> {
        (**self).add_user(user, password).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        (**self).find_by_email(email).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        (**self).get_user(id).await
    }

    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        (**self).authenticate_user(email, password).await
    }

    async fn verify_password(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<(), UserStoreError> {
        (**self).verify_password(id, password).await
    }

    async fn set_new_password(
        &self,
        id: &UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        (**self).set_new_password(id, new_password).await
    }

    async fn set_email_verified(&self, id: &UserId, verified: bool) -> Result<(), UserStoreError> {
        (**self).set_email_verified(id, verified).await
    }

    async fn set_two_factor(
        &self,
        id: &UserId,
        status: TwoFactorStatus,
    ) -> Result<(), UserStoreError> {
        (**self).set_two_factor(id, status).await
    }

    async fn update_email(&self, id: &UserId, email: Email) -> Result<(), UserStoreError> {
        (**self).update_email(id, email).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserStoreError> {
        (**self).delete_user(id).await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for std::sync::Arc<T> {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        (**self).insert(session).await
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError> {
        (**self).get(token).await
    }

    async fn promote(&self, token: &SessionToken) -> Result<Session, SessionStoreError> {
        (**self).promote(token).await
    }

    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        (**self).revoke(token).await
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionToken>,
    ) -> Result<(), SessionStoreError> {
        (**self).revoke_all_for_user(user_id, except).await
    }
}

#[async_trait]
impl<T: OtpCodeStore + ?Sized> OtpCodeStore for std::sync::Arc<T> {
    async fn put(&self, code: OneTimeCode) -> Result<(), OtpCodeStoreError> {
        (**self).put(code).await
    }

    async fn consume(
        &self,
        user_id: &UserId,
        submitted: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<(), OtpCodeStoreError> {
        (**self).consume(user_id, submitted, now).await
    }
}

#[async_trait]
impl<T: VerificationTokenStore + ?Sized> VerificationTokenStore for std::sync::Arc<T> {
    async fn insert(&self, token: VerificationToken) -> Result<(), VerificationTokenStoreError> {
        (**self).insert(token).await
    }

    async fn consume(
        &self,
        value: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<ConsumedToken, VerificationTokenStoreError> {
        (**self).consume(value, purpose, now).await
    }
}
