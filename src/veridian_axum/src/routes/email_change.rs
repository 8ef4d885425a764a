use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::Secret;
use serde::Deserialize;
use veridian_application::{ConfirmEmailChangeUseCase, RequestEmailChangeUseCase};
use veridian_core::Email;

use super::{current_user, error::AuthApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RequestEmailChangeRequest {
    pub new_email: Secret<String>,
}

/// POST /email/change-request. The confirmation token goes to the new
/// address.
#[tracing::instrument(name = "Request email change", skip_all)]
pub async fn request_email_change(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RequestEmailChangeRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let (user, _) = current_user(&state, &jar).await?;
    let new_email = Email::try_from(request.new_email)?;

    let use_case = RequestEmailChangeUseCase::new(
        state.user_store.clone(),
        state.token_store.clone(),
        state.email_client.clone(),
        state.policy.change_email_ttl,
    );
    use_case.execute(&user, new_email).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct ConfirmEmailChangeRequest {
    pub token: String,
}

/// POST /email/change. Applies the address carried by the token.
#[tracing::instrument(name = "Confirm email change", skip_all)]
pub async fn confirm_email_change(
    State(state): State<AppState>,
    Json(request): Json<ConfirmEmailChangeRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let use_case =
        ConfirmEmailChangeUseCase::new(state.token_store.clone(), state.user_store.clone());
    use_case.execute(&request.token).await?;

    Ok(StatusCode::OK)
}
