use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use veridian_adapters::extract_session_token;
use veridian_application::{RequestOtpUseCase, VerifyOtpUseCase};
use veridian_core::OtpCode;

use super::error::AuthApiError;
use crate::state::AppState;

/// POST /otp/request. (Re)sends the emailed sign-in code for a session
/// that is pending its second factor.
#[tracing::instrument(name = "Request OTP", skip_all)]
pub async fn request_otp(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError> {
    let token = extract_session_token(&jar).ok_or(AuthApiError::MissingSession)?;

    let use_case = RequestOtpUseCase::new(
        state.session_store.clone(),
        state.user_store.clone(),
        state.otp_store.clone(),
        state.email_client.clone(),
        state.rate_limiter.clone(),
        state.policy.otp_ttl,
        state.policy.otp_max_attempts,
    );
    use_case.execute(&token).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub code: String,
}

/// POST /otp/verify. Consumes the emailed code and promotes the pending
/// session; the cookie already names the right session.
#[tracing::instrument(name = "Verify OTP", skip_all)]
pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let token = extract_session_token(&jar).ok_or(AuthApiError::MissingSession)?;
    let code = OtpCode::parse(request.code)?;

    let use_case = VerifyOtpUseCase::new(
        state.session_store.clone(),
        state.otp_store.clone(),
        state.rate_limiter.clone(),
    );
    use_case.execute(&token, code).await?;

    Ok(StatusCode::OK)
}
