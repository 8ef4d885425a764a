use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use secrecy::Secret;
use serde::Deserialize;
use veridian_application::SignupUseCase;
use veridian_core::{Email, Password};

use super::{UserResponse, error::AuthApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub name: String,
}

/// POST /signup. Registration does not sign the user in; the client
/// follows up with a login.
#[tracing::instrument(name = "Signup", skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = SignupUseCase::new(
        state.user_store.clone(),
        state.token_store.clone(),
        state.email_client.clone(),
        state.policy.verify_email_ttl,
    );
    let user = use_case.execute(email, password, request.name).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
