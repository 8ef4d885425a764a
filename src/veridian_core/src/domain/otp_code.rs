use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use super::user::UserId;

pub const OTP_DIGITS: usize = 6;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Code must be {OTP_DIGITS} digits")]
    InvalidCode,
}

/// Why an OTP submission was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpVerifyError {
    #[error("Code has expired")]
    Expired,
    #[error("Code has already been used")]
    AlreadyConsumed,
    #[error("Too many incorrect attempts")]
    AttemptsExceeded,
    #[error("Incorrect code")]
    Mismatch,
}

/// Fixed-length numeric one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a code from the thread-local CSPRNG, zero-padded to
    /// `OTP_DIGITS` digits.
    pub fn random() -> Self {
        let n: u32 = rand::rng().random_range(0..1_000_000);
        Self(format!("{n:06}"))
    }

    pub fn parse(value: String) -> Result<Self, OtpError> {
        if value.len() == OTP_DIGITS && value.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(value))
        } else {
            Err(OtpError::InvalidCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored one-time code with its single-use bookkeeping.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    user_id: UserId,
    code: OtpCode,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    consumed: bool,
    attempts: u32,
    max_attempts: u32,
}

impl OneTimeCode {
    pub fn new(user_id: UserId, code: OtpCode, time_to_live: Duration, max_attempts: u32) -> Self {
        let issued_at = Utc::now();
        Self {
            user_id,
            code,
            issued_at,
            expires_at: issued_at + time_to_live,
            consumed: false,
            attempts: 0,
            max_attempts,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check a submitted code and advance the record's state.
    ///
    /// Exhaustion is checked before the value compare, so a correct code
    /// submitted after the attempt budget is spent still fails. A mismatch
    /// spends one attempt. Success consumes the code permanently.
    pub fn verify(&mut self, submitted: &OtpCode, now: DateTime<Utc>) -> Result<(), OtpVerifyError> {
        if self.consumed {
            return Err(OtpVerifyError::AlreadyConsumed);
        }
        if now > self.expires_at {
            return Err(OtpVerifyError::Expired);
        }
        if self.attempts >= self.max_attempts {
            return Err(OtpVerifyError::AttemptsExceeded);
        }
        if self.code != *submitted {
            self.attempts += 1;
            return Err(OtpVerifyError::Mismatch);
        }
        self.consumed = true;
        Ok(())
    }
}
