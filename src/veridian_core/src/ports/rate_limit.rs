use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Mutating auth flows that are throttled per identity or IP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RateLimitAction {
    SignIn,
    OtpRequest,
    OtpVerify,
    PasswordReset,
}

impl RateLimitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::OtpRequest => "otp-request",
            Self::OtpVerify => "otp-verify",
            Self::PasswordReset => "password-reset",
        }
    }
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Too many requests")]
    TooManyRequests { retry_after: Duration },
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Window counter keyed by `(action, identity-or-ip)`. Exceeding the
/// threshold fails closed regardless of credential correctness.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, identity: &str, action: RateLimitAction) -> Result<(), RateLimitError>;
}

#[async_trait]
impl<T: RateLimiter + ?Sized> RateLimiter for std::sync::Arc<T> {
    async fn check(&self, identity: &str, action: RateLimitAction) -> Result<(), RateLimitError> {
        (**self).check(identity, action).await
    }
}
