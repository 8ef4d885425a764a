use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use veridian_adapters::create_removal_cookie;
use veridian_application::{ConfirmAccountDeletionUseCase, RequestAccountDeletionUseCase};

use super::{current_user, error::AuthApiError};
use crate::state::AppState;

/// POST /account/delete-request. Arms deletion by emailing the owner a
/// confirmation token; nothing is removed yet.
#[tracing::instrument(name = "Request account deletion", skip_all)]
pub async fn request_account_deletion(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError> {
    let (user, _) = current_user(&state, &jar).await?;

    let use_case = RequestAccountDeletionUseCase::new(
        state.token_store.clone(),
        state.email_client.clone(),
        state.policy.delete_account_ttl,
    );
    use_case.execute(&user).await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct ConfirmAccountDeletionRequest {
    pub token: String,
}

/// DELETE /account. Consumes the confirmation token, removes the
/// account, and revokes every one of its sessions.
#[tracing::instrument(name = "Confirm account deletion", skip_all)]
pub async fn confirm_account_deletion(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ConfirmAccountDeletionRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let use_case = ConfirmAccountDeletionUseCase::new(
        state.token_store.clone(),
        state.user_store.clone(),
        state.session_store.clone(),
    );
    use_case.execute(&request.token).await?;

    let jar = jar.add(create_removal_cookie());
    Ok((jar, StatusCode::OK))
}
