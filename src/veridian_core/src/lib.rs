pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    otp_code::{OneTimeCode, OtpCode, OtpError, OtpVerifyError},
    password::{Password, PasswordError},
    session::{Session, SessionState, SessionToken},
    user::{TwoFactorStatus, User, UserId},
    verification::{TokenConsumeError, TokenPurpose, VerificationToken},
};

pub use ports::{
    rate_limit::{RateLimitAction, RateLimitError, RateLimiter},
    repositories::{
        ConsumedToken, OtpCodeStore, OtpCodeStoreError, SessionStore, SessionStoreError,
        UserStore, UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
    },
    services::{EmailClient, EmailClientError, TotpError, TotpVerifier, TwoFactorEnrollment},
};
