use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use veridian_adapters::{create_removal_cookie, extract_session_token};
use veridian_application::LogoutUseCase;

use super::error::AuthApiError;
use crate::state::AppState;

/// POST /logout. Idempotent: a missing, unknown, or already revoked
/// session all produce the same response.
#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError> {
    if let Some(token) = extract_session_token(&jar) {
        LogoutUseCase::new(state.session_store.clone())
            .execute(&token)
            .await?;
    }

    let jar = jar.add(create_removal_cookie());
    Ok((jar, StatusCode::OK))
}
