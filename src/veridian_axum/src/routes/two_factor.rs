use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use veridian_adapters::extract_session_token;
use veridian_application::{Disable2FaUseCase, Enable2FaUseCase, VerifyTotpUseCase};
use veridian_core::Password;

use super::{current_user, error::AuthApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TwoFactorPasswordRequest {
    pub password: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    pub secret: String,
    pub otpauth_url: String,
}

/// POST /2fa/enable. Requires the current password; returns the secret
/// and provisioning URI for the authenticator app.
#[tracing::instrument(name = "Enable 2FA", skip_all)]
pub async fn enable_two_factor(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<TwoFactorPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let (user, _) = current_user(&state, &jar).await?;
    let password = Password::try_from(request.password)?;

    let use_case = Enable2FaUseCase::new(state.user_store.clone(), state.totp.clone());
    let enrollment = use_case.execute(&user, password).await?;

    Ok(Json(EnrollmentResponse {
        secret: enrollment.secret_base32.expose_secret().clone(),
        otpauth_url: enrollment.otpauth_url.expose_secret().clone(),
    }))
}

/// POST /2fa/disable. Requires the current password.
#[tracing::instrument(name = "Disable 2FA", skip_all)]
pub async fn disable_two_factor(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<TwoFactorPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let (user, _) = current_user(&state, &jar).await?;
    let password = Password::try_from(request.password)?;

    let use_case = Disable2FaUseCase::new(state.user_store.clone());
    use_case.execute(&user, password).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct VerifyTotpRequest {
    pub code: String,
}

/// POST /2fa/verify-totp. Completes a pending session with an
/// authenticator-app code.
#[tracing::instrument(name = "Verify TOTP", skip_all)]
pub async fn verify_totp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<VerifyTotpRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let token = extract_session_token(&jar).ok_or(AuthApiError::MissingSession)?;

    let use_case = VerifyTotpUseCase::new(
        state.session_store.clone(),
        state.user_store.clone(),
        state.totp.clone(),
        state.rate_limiter.clone(),
    );
    use_case.execute(&token, &request.code).await?;

    Ok(StatusCode::OK)
}
