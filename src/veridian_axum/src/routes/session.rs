use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;

use super::{UserResponse, current_user, error::AuthApiError};
use crate::state::AppState;

/// GET /session. Resolves the cookie to the signed-in user.
#[tracing::instrument(name = "Current session", skip_all)]
pub async fn current_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError> {
    let (user, _) = current_user(&state, &jar).await?;
    Ok(Json(UserResponse::from(&user)))
}
