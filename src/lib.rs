//! # Veridian - Authentication Core Library
//!
//! Facade crate re-exporting the public APIs of the Veridian
//! authentication components. Use this crate to get the whole stack in
//! one place.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `User`, `Session`, etc.
//! - **Repository traits**: `UserStore`, `SessionStore`, `OtpCodeStore`,
//!   `VerificationTokenStore`
//! - **Use cases**: `SignupUseCase`, `LoginUseCase`, etc.
//! - **Adapters**: `PostgresUserStore`, `RedisSessionStore`,
//!   `ResendEmailClient`, etc.
//! - **Service**: `AuthService` - the assembled HTTP service

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use veridian_core::*;
}

// Re-export most commonly used core types at the root level
pub use veridian_core::{
    Email, EmailError, OneTimeCode, OtpCode, OtpError, OtpVerifyError, Password, PasswordError,
    Session, SessionState, SessionToken, TokenPurpose, TwoFactorStatus, User, UserId,
    VerificationToken,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use veridian_core::{
        OtpCodeStore, OtpCodeStoreError, SessionStore, SessionStoreError, UserStore,
        UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
    };
}

// Re-export repository traits at root level
pub use veridian_core::{
    EmailClient, OtpCodeStore, OtpCodeStoreError, RateLimiter, SessionStore, SessionStoreError,
    TotpVerifier, UserStore, UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use veridian_application::*;
}

// Re-export use cases at root level
pub use veridian_application::{
    ChangePasswordUseCase, LoginUseCase, LogoutUseCase, RequestOtpUseCase, ResetPasswordUseCase,
    SignupUseCase, ValidateSessionUseCase, VerifyEmailUseCase, VerifyOtpUseCase, VerifyTotpUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use veridian_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use veridian_adapters::email::*;
    }

    /// Password hashing, cookies, and TOTP
    pub mod auth {
        pub use veridian_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use veridian_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use veridian_adapters::{
    FixedWindowRateLimiter, InMemoryOtpCodeStore, InMemorySessionStore, InMemoryUserStore,
    InMemoryVerificationTokenStore, MockEmailClient, PostgresUserStore, RedisSessionStore,
    ResendEmailClient, TotpEngine,
};

// ============================================================================
// HTTP Boundary and Service (Main Entry Point)
// ============================================================================

/// Axum handlers and shared state
pub use veridian_axum::{AppState, AuthApiError, ErrorResponse};

/// Main auth service
pub use veridian_auth_service::{
    AuthService,
    helpers::{configure_postgresql, configure_redis, get_redis_client},
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
