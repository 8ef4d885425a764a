use std::sync::Arc;

use color_eyre::eyre::{Context, eyre};
use reqwest::Client as HttpClient;
use secrecy::Secret;
use tokio::sync::Mutex;
use veridian_adapters::{
    FixedWindowRateLimiter, InMemoryOtpCodeStore, InMemoryVerificationTokenStore,
    PostgresUserStore, RedisSessionStore, ResendEmailClient, TotpEngine,
    config::{AllowedOrigins, AuthServiceSetting, env},
};
use veridian_auth_service::{
    AuthService,
    helpers::{configure_postgresql, configure_redis},
};
use veridian_axum::{AppState, state::AuthPolicy};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    dotenvy::dotenv().ok();
    let config = AuthServiceSetting::load();

    let pg_pool = configure_postgresql().await;
    let redis_conn = Arc::new(Mutex::new(configure_redis()));

    let resend_token = std::env::var(env::RESEND_AUTH_TOKEN_ENV_VAR)
        .map(Secret::from)
        .wrap_err_with(|| eyre!("{} must be set", env::RESEND_AUTH_TOKEN_ENV_VAR))?;
    let http_client = HttpClient::builder()
        .timeout(std::time::Duration::from_millis(config.email.timeout_ms))
        .build()?;
    let email_client = ResendEmailClient::new(
        config.email.base_url.clone(),
        config.email.sender.clone(),
        resend_token,
        http_client,
    );

    let rate_limit_window = std::time::Duration::from_secs(config.rate_limit.window_secs);

    let state = AppState {
        user_store: Arc::new(PostgresUserStore::new(pg_pool)),
        session_store: Arc::new(RedisSessionStore::new(redis_conn)),
        // OTP codes, verification tokens, and rate-limit windows are
        // short-lived and survive on process-local storage.
        otp_store: Arc::new(InMemoryOtpCodeStore::new()),
        token_store: Arc::new(InMemoryVerificationTokenStore::new()),
        email_client: Arc::new(email_client),
        rate_limiter: Arc::new(FixedWindowRateLimiter::new(
            rate_limit_window,
            config.rate_limit.max_attempts,
        )),
        totp: Arc::new(TotpEngine::new(config.totp.issuer.clone())),
        policy: AuthPolicy::from_settings(config),
    };

    let listener = tokio::net::TcpListener::bind(&config.app.address).await?;

    AuthService::new(state)
        .run_standalone(listener, AllowedOrigins::from_env())
        .await?;

    Ok(())
}

fn init_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .init();
}
