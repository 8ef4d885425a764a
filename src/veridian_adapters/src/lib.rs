pub mod auth;
pub mod config;
pub mod email;
pub mod persistence;

pub use auth::{
    TotpEngine, create_removal_cookie, create_session_cookie, extract_session_token,
};
pub use email::{MockEmailClient, ResendEmailClient};
pub use persistence::{
    FixedWindowRateLimiter, InMemoryOtpCodeStore, InMemorySessionStore, InMemoryUserStore,
    InMemoryVerificationTokenStore, PostgresUserStore, RedisSessionStore,
};
