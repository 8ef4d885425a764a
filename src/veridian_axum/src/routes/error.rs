use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use veridian_application::{
    ChangePasswordError, ConfirmAccountDeletionError, ConfirmEmailChangeError, Disable2FaError,
    Enable2FaError, LoginError, LogoutError, RequestAccountDeletionError, RequestEmailChangeError,
    RequestOtpError, RequestPasswordResetError, ResetPasswordError, SignupError,
    ValidateSessionError, VerifyEmailError, VerifyOtpError, VerifyTotpError,
};
use veridian_core::{
    EmailError, OtpCodeStoreError, OtpError, PasswordError, RateLimitError, SessionStoreError,
    UserStoreError, VerificationTokenStoreError,
};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing session")]
    MissingSession,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Too many requests")]
    TooManyRequests { retry_after: Duration },

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match &self {
            AuthApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AuthApiError::MissingSession
            | AuthApiError::InvalidCredentials
            | AuthApiError::AuthenticationError(_) => (StatusCode::UNAUTHORIZED, self.to_string()),

            AuthApiError::UserAlreadyExists => (StatusCode::CONFLICT, self.to_string()),

            AuthApiError::TooManyRequests { retry_after } => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                });
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, retry_after.as_secs().to_string())],
                    body,
                )
                    .into_response();
            }

            AuthApiError::UnexpectedError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status_code, body).into_response()
    }
}

impl From<EmailError> for AuthApiError {
    fn from(error: EmailError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordError> for AuthApiError {
    fn from(error: PasswordError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<OtpError> for AuthApiError {
    fn from(error: OtpError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<RateLimitError> for AuthApiError {
    fn from(error: RateLimitError) -> Self {
        match error {
            RateLimitError::TooManyRequests { retry_after } => {
                AuthApiError::TooManyRequests { retry_after }
            }
            RateLimitError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<UserStoreError> for AuthApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AuthApiError::UserAlreadyExists,
            UserStoreError::UserNotFound | UserStoreError::IncorrectPassword => {
                AuthApiError::InvalidCredentials
            }
            UserStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SessionStoreError> for AuthApiError {
    fn from(error: SessionStoreError) -> Self {
        match error {
            SessionStoreError::NotFound | SessionStoreError::NotPending => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            SessionStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<OtpCodeStoreError> for AuthApiError {
    fn from(error: OtpCodeStoreError) -> Self {
        match error {
            OtpCodeStoreError::NotFound | OtpCodeStoreError::Invalid(_) => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            OtpCodeStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<VerificationTokenStoreError> for AuthApiError {
    fn from(error: VerificationTokenStoreError) -> Self {
        match error {
            VerificationTokenStoreError::NotFound | VerificationTokenStoreError::Invalid(_) => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            VerificationTokenStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<SignupError> for AuthApiError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::UserStoreError(e) => e.into(),
            SignupError::TokenStoreError(e) => e.into(),
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
            LoginError::RateLimited(e) => e.into(),
            LoginError::SessionStoreError(e) => e.into(),
            LoginError::OtpCodeStoreError(e) => e.into(),
            LoginError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::SessionStoreError(e) => e.into(),
        }
    }
}

impl From<ValidateSessionError> for AuthApiError {
    fn from(error: ValidateSessionError) -> Self {
        match error {
            ValidateSessionError::NotFound
            | ValidateSessionError::Revoked
            | ValidateSessionError::Expired
            | ValidateSessionError::PendingTwoFactor => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            ValidateSessionError::SessionStoreError(e) => e.into(),
            ValidateSessionError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<RequestOtpError> for AuthApiError {
    fn from(error: RequestOtpError) -> Self {
        match error {
            RequestOtpError::SessionNotFound
            | RequestOtpError::SessionNotPending
            | RequestOtpError::TwoFactorNotEnabled => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            RequestOtpError::RateLimited(e) => e.into(),
            RequestOtpError::SessionStoreError(e) => e.into(),
            RequestOtpError::UserStoreError(e) => e.into(),
            RequestOtpError::OtpCodeStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyOtpError> for AuthApiError {
    fn from(error: VerifyOtpError) -> Self {
        match error {
            VerifyOtpError::SessionNotFound | VerifyOtpError::SessionNotPending => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            VerifyOtpError::RateLimited(e) => e.into(),
            VerifyOtpError::Otp(e) => e.into(),
            VerifyOtpError::SessionStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyTotpError> for AuthApiError {
    fn from(error: VerifyTotpError) -> Self {
        match error {
            VerifyTotpError::SessionNotFound
            | VerifyTotpError::SessionNotPending
            | VerifyTotpError::TwoFactorNotEnabled
            | VerifyTotpError::InvalidCode => {
                AuthApiError::AuthenticationError(error.to_string())
            }
            VerifyTotpError::RateLimited(e) => e.into(),
            VerifyTotpError::SessionStoreError(e) => e.into(),
            VerifyTotpError::UserStoreError(e) => e.into(),
            VerifyTotpError::TotpError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<Enable2FaError> for AuthApiError {
    fn from(error: Enable2FaError) -> Self {
        match error {
            Enable2FaError::InvalidPassword => AuthApiError::InvalidCredentials,
            Enable2FaError::UserStoreError(e) => e.into(),
            Enable2FaError::TotpError(e) => AuthApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<Disable2FaError> for AuthApiError {
    fn from(error: Disable2FaError) -> Self {
        match error {
            Disable2FaError::InvalidPassword => AuthApiError::InvalidCredentials,
            Disable2FaError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<ChangePasswordError> for AuthApiError {
    fn from(error: ChangePasswordError) -> Self {
        match error {
            ChangePasswordError::InvalidPassword => AuthApiError::InvalidCredentials,
            ChangePasswordError::UserStoreError(e) => e.into(),
            ChangePasswordError::SessionStoreError(e) => e.into(),
        }
    }
}

impl From<VerifyEmailError> for AuthApiError {
    fn from(error: VerifyEmailError) -> Self {
        match error {
            VerifyEmailError::Token(e) => e.into(),
            VerifyEmailError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<RequestPasswordResetError> for AuthApiError {
    fn from(error: RequestPasswordResetError) -> Self {
        match error {
            RequestPasswordResetError::RateLimited(e) => e.into(),
            RequestPasswordResetError::TokenStoreError(e) => e.into(),
            RequestPasswordResetError::UserStoreError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            RequestPasswordResetError::DeliveryError(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
        }
    }
}

impl From<ResetPasswordError> for AuthApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::Token(e) => e.into(),
            ResetPasswordError::UserStoreError(e) => e.into(),
            ResetPasswordError::SessionStoreError(e) => e.into(),
        }
    }
}

impl From<RequestEmailChangeError> for AuthApiError {
    fn from(error: RequestEmailChangeError) -> Self {
        match error {
            RequestEmailChangeError::EmailTaken => AuthApiError::UserAlreadyExists,
            RequestEmailChangeError::UserStoreError(e) => e.into(),
            RequestEmailChangeError::TokenStoreError(e) => e.into(),
        }
    }
}

impl From<ConfirmEmailChangeError> for AuthApiError {
    fn from(error: ConfirmEmailChangeError) -> Self {
        match error {
            ConfirmEmailChangeError::Token(e) => e.into(),
            ConfirmEmailChangeError::MissingPayload => {
                AuthApiError::UnexpectedError(error.to_string())
            }
            ConfirmEmailChangeError::InvalidPayload(e) => {
                AuthApiError::UnexpectedError(e.to_string())
            }
            ConfirmEmailChangeError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<RequestAccountDeletionError> for AuthApiError {
    fn from(error: RequestAccountDeletionError) -> Self {
        match error {
            RequestAccountDeletionError::TokenStoreError(e) => e.into(),
        }
    }
}

impl From<ConfirmAccountDeletionError> for AuthApiError {
    fn from(error: ConfirmAccountDeletionError) -> Self {
        match error {
            ConfirmAccountDeletionError::Token(e) => e.into(),
            ConfirmAccountDeletionError::UserStoreError(e) => e.into(),
            ConfirmAccountDeletionError::SessionStoreError(e) => e.into(),
        }
    }
}
