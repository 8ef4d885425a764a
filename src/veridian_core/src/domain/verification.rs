use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;

use super::user::UserId;

const TOKEN_VALUE_LENGTH: usize = 32;

/// What a verification token proves, and therefore which side effect its
/// consumer is allowed to apply. The service itself never applies side
/// effects; it only vouches for validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    VerifyEmail,
    ResetPassword,
    ChangeEmail,
    DeleteAccount,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerifyEmail => "verify-email",
            Self::ResetPassword => "reset-password",
            Self::ChangeEmail => "change-email",
            Self::DeleteAccount => "delete-account",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenConsumeError {
    #[error("Token was issued for a different purpose")]
    WrongPurpose,
    #[error("Token has already been used")]
    AlreadyConsumed,
    #[error("Token has expired")]
    Expired,
}

/// Single-use token proving control of an email address or confirming a
/// sensitive account action.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    value: String,
    user_id: UserId,
    purpose: TokenPurpose,
    payload: Option<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    consumed: bool,
}

impl VerificationToken {
    pub fn new(
        user_id: UserId,
        purpose: TokenPurpose,
        payload: Option<String>,
        time_to_live: Duration,
    ) -> Self {
        let value = rand::rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_VALUE_LENGTH)
            .map(char::from)
            .collect();
        let issued_at = Utc::now();
        Self {
            value,
            user_id,
            purpose,
            payload,
            issued_at,
            expires_at: issued_at + time_to_live,
            consumed: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn purpose(&self) -> TokenPurpose {
        self.purpose
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Mark the token used, if it is valid for `purpose` at `now`.
    ///
    /// A wrong-purpose submission does not burn the token.
    pub fn consume(
        &mut self,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<(), TokenConsumeError> {
        if self.purpose != purpose {
            return Err(TokenConsumeError::WrongPurpose);
        }
        if self.consumed {
            return Err(TokenConsumeError::AlreadyConsumed);
        }
        if now > self.expires_at {
            return Err(TokenConsumeError::Expired);
        }
        self.consumed = true;
        Ok(())
    }
}
