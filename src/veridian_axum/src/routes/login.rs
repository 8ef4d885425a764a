use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use veridian_adapters::create_session_cookie;
use veridian_application::{LoginResponse, LoginUseCase};
use veridian_core::{Email, Password};

use super::{UserResponse, error::AuthApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponseBody {
    pub two_factor_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

/// POST /login. Both outcomes set the session cookie; a pending session
/// grants nothing until the second factor is verified.
#[tracing::instrument(name = "Login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError> {
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = LoginUseCase::new(
        state.user_store.clone(),
        state.session_store.clone(),
        state.otp_store.clone(),
        state.email_client.clone(),
        state.rate_limiter.clone(),
        state.policy.session_ttl,
        state.policy.pending_session_ttl,
        state.policy.otp_ttl,
        state.policy.otp_max_attempts,
    );

    let (body, session) = match use_case.execute(email, password).await? {
        LoginResponse::Success { user, session } => (
            LoginResponseBody {
                two_factor_required: false,
                user: Some(UserResponse::from(&user)),
            },
            session,
        ),
        LoginResponse::RequiresTwoFactor { session } => (
            LoginResponseBody {
                two_factor_required: true,
                user: None,
            },
            session,
        ),
    };

    let jar = jar.add(create_session_cookie(session.token()));
    Ok((jar, (StatusCode::OK, Json(body))))
}
