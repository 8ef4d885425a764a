pub mod fixed_window_rate_limiter;
pub mod in_memory_otp_code_store;
pub mod in_memory_session_store;
pub mod in_memory_user_store;
pub mod in_memory_verification_token_store;
pub mod postgres_user_store;
pub mod redis_session_store;
mod retry;

pub use fixed_window_rate_limiter::FixedWindowRateLimiter;
pub use in_memory_otp_code_store::InMemoryOtpCodeStore;
pub use in_memory_session_store::InMemorySessionStore;
pub use in_memory_user_store::InMemoryUserStore;
pub use in_memory_verification_token_store::InMemoryVerificationTokenStore;
pub use postgres_user_store::PostgresUserStore;
pub use redis_session_store::RedisSessionStore;
