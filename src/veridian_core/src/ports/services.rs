use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::domain::email::Email;

#[derive(Debug, Error)]
pub enum EmailClientError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outbound email dispatch. Callers decide whether a delivery failure is
/// fatal; the client only reports it.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError>;
}

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("Stored TOTP secret is malformed")]
    InvalidSecret,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Provisioning payload handed back on 2FA enablement. The otpauth URI is
/// what an authenticator app enrolls from; rendering it as a QR image is a
/// presentation concern outside this core.
pub struct TwoFactorEnrollment {
    pub secret_base32: Secret<String>,
    pub otpauth_url: Secret<String>,
}

/// Time-based code generation and verification (RFC 6238: 30-second step,
/// HMAC-SHA1, 6-digit truncation).
pub trait TotpVerifier: Send + Sync {
    fn generate_enrollment(&self, account: &Email) -> Result<TwoFactorEnrollment, TotpError>;
    fn check(&self, secret_base32: &Secret<String>, code: &str) -> Result<bool, TotpError>;
}

#[async_trait]
impl<T: EmailClient + ?Sized> EmailClient for std::sync::Arc<T> {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailClientError> {
        (**self).send_email(recipient, subject, content).await
    }
}

impl<T: TotpVerifier + ?Sized> TotpVerifier for std::sync::Arc<T> {
    fn generate_enrollment(&self, account: &Email) -> Result<TwoFactorEnrollment, TotpError> {
        (**self).generate_enrollment(account)
    }

    fn check(&self, secret_base32: &Secret<String>, code: &str) -> Result<bool, TotpError> {
        (**self).check(secret_base32, code)
    }
}
