use secrecy::{ExposeSecret, Secret};
use totp_rs::{Algorithm, Secret as TotpSecret, TOTP};
use veridian_core::{Email, TotpError, TotpVerifier, TwoFactorEnrollment};

const TOTP_DIGITS: usize = 6;
const TOTP_SKEW: u8 = 1;
const TOTP_STEP: u64 = 30;

/// Authenticator-app verifier backed by RFC 6238 TOTP.
#[derive(Debug, Clone)]
pub struct TotpEngine {
    issuer: String,
}

impl TotpEngine {
    pub fn new(issuer: String) -> Self {
        Self { issuer }
    }

    fn totp(&self, secret_base32: &str, account: String) -> Result<TOTP, TotpError> {
        let secret = TotpSecret::Encoded(secret_base32.to_string())
            .to_bytes()
            .map_err(|_| TotpError::InvalidSecret)?;
        TOTP::new(
            Algorithm::SHA1,
            TOTP_DIGITS,
            TOTP_SKEW,
            TOTP_STEP,
            secret,
            Some(self.issuer.clone()),
            account,
        )
        .map_err(|_| TotpError::InvalidSecret)
    }
}

impl TotpVerifier for TotpEngine {
    fn generate_enrollment(&self, account: &Email) -> Result<TwoFactorEnrollment, TotpError> {
        let secret = TotpSecret::generate_secret();
        let secret_base32 = secret.to_encoded().to_string();
        let totp = self.totp(&secret_base32, account.as_ref().expose_secret().clone())?;

        Ok(TwoFactorEnrollment {
            secret_base32: Secret::from(secret_base32),
            otpauth_url: Secret::from(totp.get_url()),
        })
    }

    fn check(&self, secret_base32: &Secret<String>, code: &str) -> Result<bool, TotpError> {
        // The account name only matters for the provisioning URL.
        let totp = self.totp(secret_base32.expose_secret(), String::new())?;
        totp.check_current(code)
            .map_err(|e| TotpError::UnexpectedError(e.to_string()))
    }
}
