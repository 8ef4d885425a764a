use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::Secret;
use serde::Deserialize;
use veridian_application::{
    ChangePasswordUseCase, RequestPasswordResetUseCase, ResetPasswordUseCase,
};
use veridian_core::{Email, Password};

use super::{current_user, error::AuthApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: Secret<String>,
}

/// POST /password/reset-request. Responds 200 whether or not the email
/// has an account.
#[tracing::instrument(name = "Request password reset", skip_all)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let email = Email::try_from(request.email)?;

    let use_case = RequestPasswordResetUseCase::new(
        state.user_store.clone(),
        state.token_store.clone(),
        state.email_client.clone(),
        state.rate_limiter.clone(),
        state.policy.reset_password_ttl,
    );
    use_case.execute(&email).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: Secret<String>,
}

/// POST /password/reset. Consumes the reset token; every session of the
/// account is revoked.
#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let new_password = Password::try_from(request.new_password)?;

    let use_case = ResetPasswordUseCase::new(
        state.token_store.clone(),
        state.user_store.clone(),
        state.session_store.clone(),
    );
    use_case.execute(&request.token, new_password).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Secret<String>,
    pub new_password: Secret<String>,
}

/// POST /password/change. Requires an active session plus the current
/// password; other sessions are swept if so configured.
#[tracing::instrument(name = "Change password", skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let (user, token) = current_user(&state, &jar).await?;
    let current_password = Password::try_from(request.current_password)?;
    let new_password = Password::try_from(request.new_password)?;

    let use_case = ChangePasswordUseCase::new(
        state.user_store.clone(),
        state.session_store.clone(),
        state.policy.revoke_sessions_on_password_change,
    );
    use_case
        .execute(&user, &token, current_password, new_password)
        .await?;

    Ok(StatusCode::OK)
}
