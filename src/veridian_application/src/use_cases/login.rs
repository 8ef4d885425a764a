use chrono::Duration;
use secrecy::ExposeSecret;
use veridian_core::{
    Email, EmailClient, OneTimeCode, OtpCode, OtpCodeStore, OtpCodeStoreError, Password,
    RateLimitAction, RateLimitError, RateLimiter, Session, SessionState, SessionStore,
    SessionStoreError, User, UserStore, UserStoreError,
};

/// Response from the login use case
#[derive(Debug)]
pub enum LoginResponse {
    /// Primary factor sufficed; the session is active.
    Success { user: User, session: Session },
    /// Second factor outstanding; a code was dispatched and the session is
    /// pending until it is verified.
    RequiresTwoFactor { session: Session },
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown email and wrong password collapse into this one variant so
    /// responses cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("Session store error: {0}")]
    SessionStoreError(#[from] SessionStoreError),
    #[error("OTP code store error: {0}")]
    OtpCodeStoreError(#[from] OtpCodeStoreError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// Login use case - primary-factor authentication and session issuance
pub struct LoginUseCase<U, S, O, E, R>
where
    U: UserStore,
    S: SessionStore,
    O: OtpCodeStore,
    E: EmailClient,
    R: RateLimiter,
{
    user_store: U,
    session_store: S,
    otp_store: O,
    email_client: E,
    rate_limiter: R,
    session_ttl: Duration,
    pending_session_ttl: Duration,
    otp_ttl: Duration,
    otp_max_attempts: u32,
}

impl<U, S, O, E, R> LoginUseCase<U, S, O, E, R>
where
    U: UserStore,
    S: SessionStore,
    O: OtpCodeStore,
    E: EmailClient,
    R: RateLimiter,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_store: U,
        session_store: S,
        otp_store: O,
        email_client: E,
        rate_limiter: R,
        session_ttl: Duration,
        pending_session_ttl: Duration,
        otp_ttl: Duration,
        otp_max_attempts: u32,
    ) -> Self {
        Self {
            user_store,
            session_store,
            otp_store,
            email_client,
            rate_limiter,
            session_ttl,
            pending_session_ttl,
            otp_ttl,
            otp_max_attempts,
        }
    }

    /// Execute the login use case
    ///
    /// The rate limit is consulted before credentials are looked at, so an
    /// over-limit caller learns nothing about credential correctness.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<LoginResponse, LoginError> {
        self.rate_limiter
            .check(email.as_ref().expose_secret(), RateLimitAction::SignIn)
            .await?;

        let user = self
            .user_store
            .authenticate_user(&email, &password)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound | UserStoreError::IncorrectPassword => {
                    LoginError::InvalidCredentials
                }
                UserStoreError::UserAlreadyExists => {
                    LoginError::UnexpectedError(e.to_string())
                }
                UserStoreError::UnexpectedError(msg) => LoginError::UnexpectedError(msg),
            })?;

        if user.two_factor().is_enabled() {
            self.handle_two_factor_required(user).await
        } else {
            let session = Session::new(*user.id(), SessionState::Active, self.session_ttl);
            self.session_store.insert(session.clone()).await?;
            Ok(LoginResponse::Success { user, session })
        }
    }

    /// Issue a pending session and dispatch a fresh OTP. The pending
    /// session lives only as long as the window to complete the second
    /// factor.
    async fn handle_two_factor_required(&self, user: User) -> Result<LoginResponse, LoginError> {
        let session = Session::new(
            *user.id(),
            SessionState::PendingTwoFactor,
            self.pending_session_ttl,
        );
        self.session_store.insert(session.clone()).await?;

        let code = OtpCode::random();
        self.otp_store
            .put(OneTimeCode::new(
                *user.id(),
                code.clone(),
                self.otp_ttl,
                self.otp_max_attempts,
            ))
            .await?;

        // Issuance stands even when the send fails; the client can ask for
        // a resend.
        if let Err(e) = self
            .email_client
            .send_email(user.email(), "Your sign-in code", code.as_str())
            .await
        {
            tracing::warn!(error = %e, "Failed to deliver sign-in code");
        }

        Ok(LoginResponse::RequiresTwoFactor { session })
    }
}
