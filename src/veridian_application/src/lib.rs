pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use use_cases::{
    change_email::{
        ConfirmEmailChangeError, ConfirmEmailChangeUseCase, RequestEmailChangeError,
        RequestEmailChangeUseCase,
    },
    change_password::{ChangePasswordError, ChangePasswordUseCase},
    delete_account::{
        ConfirmAccountDeletionError, ConfirmAccountDeletionUseCase, RequestAccountDeletionError,
        RequestAccountDeletionUseCase,
    },
    disable_2fa::{Disable2FaError, Disable2FaUseCase},
    enable_2fa::{Enable2FaError, Enable2FaUseCase},
    login::{LoginError, LoginResponse, LoginUseCase},
    logout::{LogoutError, LogoutUseCase},
    request_otp::{RequestOtpError, RequestOtpUseCase},
    reset_password::{
        RequestPasswordResetError, RequestPasswordResetUseCase, ResetPasswordError,
        ResetPasswordUseCase,
    },
    signup::{SignupError, SignupUseCase},
    validate_session::{ValidateSessionError, ValidateSessionUseCase},
    verify_email::{VerifyEmailError, VerifyEmailUseCase},
    verify_otp::{VerifyOtpError, VerifyOtpUseCase},
    verify_totp::{VerifyTotpError, VerifyTotpUseCase},
};
