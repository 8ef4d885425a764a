use std::sync::LazyLock;

use axum::http::HeaderValue;
use secrecy::Secret;
use serde::Deserialize;

use super::constants::env;

/// Service settings, loaded once. Defaults are baked in; a `config/`
/// JSON file and `VERIDIAN__`-prefixed environment variables override
/// them, secrets come from the environment only.
#[derive(Debug, Deserialize)]
pub struct AuthServiceSetting {
    pub app: AppSettings,
    pub session: SessionSettings,
    pub otp: OtpSettings,
    pub verification: VerificationSettings,
    pub rate_limit: RateLimitSettings,
    pub totp: TotpSettings,
    pub postgres: PostgresSettings,
    pub redis: RedisSettings,
    pub email: EmailSettings,
}

#[derive(Debug, Deserialize)]
pub struct AppSettings {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_minutes: i64,
    /// Lifetime of a session still awaiting its second factor.
    pub pending_ttl_minutes: i64,
    pub revoke_on_password_change: bool,
}

#[derive(Debug, Deserialize)]
pub struct OtpSettings {
    pub ttl_minutes: i64,
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize)]
pub struct VerificationSettings {
    pub verify_email_ttl_hours: i64,
    pub reset_password_ttl_minutes: i64,
    pub change_email_ttl_hours: i64,
    pub delete_account_ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitSettings {
    pub window_secs: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize)]
pub struct TotpSettings {
    pub issuer: String,
}

#[derive(Debug, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender: String,
    pub timeout_ms: u64,
}

static SETTINGS: LazyLock<AuthServiceSetting> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    AuthServiceSetting::build().expect("Failed to load service configuration")
});

impl AuthServiceSetting {
    pub fn load() -> &'static Self {
        &SETTINGS
    }

    fn build() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("app.address", super::constants::prod::APP_ADDRESS)?
            .set_default("session.cookie_name", "veridian_session")?
            .set_default("session.ttl_minutes", 60 * 24 * 7)?
            .set_default("session.pending_ttl_minutes", 10)?
            .set_default("session.revoke_on_password_change", true)?
            .set_default("otp.ttl_minutes", 5)?
            .set_default("otp.max_attempts", 5)?
            .set_default("verification.verify_email_ttl_hours", 24)?
            .set_default("verification.reset_password_ttl_minutes", 60)?
            .set_default("verification.change_email_ttl_hours", 24)?
            .set_default("verification.delete_account_ttl_hours", 1)?
            .set_default("rate_limit.window_secs", 60)?
            .set_default("rate_limit.max_attempts", 10)?
            .set_default("totp.issuer", "Veridian")?
            .set_default("postgres.url", "")?
            .set_default("redis.host_name", "127.0.0.1")?
            .set_default(
                "email.base_url",
                super::constants::prod::email_client::BASE_URL,
            )?
            .set_default("email.sender", "auth@veridian.dev")?
            .set_default("email.timeout_ms", 10_000)?
            .add_source(config::File::with_name("config/veridian").required(false))
            .add_source(config::Environment::with_prefix("VERIDIAN").separator("__"));

        if let Ok(url) = std::env::var(env::DATABASE_URL_ENV_VAR) {
            builder = builder.set_override("postgres.url", url)?;
        }
        if let Ok(host) = std::env::var(env::REDIS_HOST_NAME_ENV_VAR) {
            builder = builder.set_override("redis.host_name", host)?;
        }

        builder.build()?.try_deserialize()
    }
}

/// CORS origin allow-list, parsed from a comma-separated environment
/// variable.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(env::ALLOWED_ORIGINS_ENV_VAR).ok()?;
        let origins: Vec<HeaderValue> = raw
            .split(',')
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect();
        (!origins.is_empty()).then_some(Self(origins))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.contains(origin)
    }
}

impl FromIterator<HeaderValue> for AllowedOrigins {
    fn from_iter<I: IntoIterator<Item = HeaderValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
