use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use veridian_application::VerifyEmailUseCase;

use super::error::AuthApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// POST /verify-email. Consumes the mailed token; no session required,
/// the token itself is the proof.
#[tracing::instrument(name = "Verify email", skip_all)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let use_case =
        VerifyEmailUseCase::new(state.token_store.clone(), state.user_store.clone());
    use_case.execute(&request.token).await?;

    Ok(StatusCode::OK)
}
