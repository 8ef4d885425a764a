//! Axum route handlers.
//!
//! Each handler parses the request into domain types, assembles the
//! matching use case from `AppState`, and maps its outcome onto a
//! status code, body, and cookie jar.

pub mod account;
pub mod email_change;
pub mod error;
pub mod login;
pub mod logout;
pub mod otp;
pub mod password;
pub mod session;
pub mod signup;
pub mod two_factor;
pub mod verify_email;

pub use account::{confirm_account_deletion, request_account_deletion};
pub use email_change::{confirm_email_change, request_email_change};
pub use login::login;
pub use logout::logout;
pub use otp::{request_otp, verify_otp};
pub use password::{change_password, request_password_reset, reset_password};
pub use session::current_session;
pub use signup::signup;
pub use two_factor::{disable_two_factor, enable_two_factor, verify_totp};
pub use verify_email::verify_email;

use axum_extra::extract::CookieJar;
use secrecy::ExposeSecret;
use serde::Serialize;
use veridian_adapters::extract_session_token;
use veridian_application::ValidateSessionUseCase;
use veridian_core::{SessionToken, User};

use crate::state::AppState;
use error::AuthApiError;

/// User shape returned by the API. The password hash and TOTP secret
/// never leave the stores.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().as_ref().expose_secret().clone(),
            name: user.name().to_string(),
            avatar_url: user.avatar_url().map(str::to_string),
            email_verified: user.email_verified(),
            two_factor_enabled: user.two_factor().is_enabled(),
        }
    }
}

/// Resolve the session cookie to its user. Pending, revoked, and
/// expired sessions are all rejected here.
pub(crate) async fn current_user(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(User, SessionToken), AuthApiError> {
    let token = extract_session_token(jar).ok_or(AuthApiError::MissingSession)?;
    let use_case =
        ValidateSessionUseCase::new(state.session_store.clone(), state.user_store.clone());
    let user = use_case.execute(&token).await?;
    Ok((user, token))
}
