use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::Secret;
use uuid::Uuid;

use super::email::Email;

/// Opaque user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(value)?))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Two-factor state of an account.
///
/// The TOTP secret exists exactly when 2FA is enabled; there is no way to
/// represent an enabled account without a secret or vice versa.
#[derive(Debug, Clone)]
pub enum TwoFactorStatus {
    Disabled,
    Enabled { secret: Secret<String> },
}

impl TwoFactorStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    pub fn secret(&self) -> Option<&Secret<String>> {
        match self {
            Self::Disabled => None,
            Self::Enabled { secret } => Some(secret),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: Email,
    name: String,
    avatar_url: Option<String>,
    email_verified: bool,
    two_factor: TwoFactorStatus,
    created_at: DateTime<Utc>,
}

impl User {
    /// A freshly signed-up user: unverified email, 2FA off.
    pub fn new(email: Email, name: String) -> Self {
        Self {
            id: UserId::new(),
            email,
            name,
            avatar_url: None,
            email_verified: false,
            two_factor: TwoFactorStatus::Disabled,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct a user from a persisted record.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        email: Email,
        name: String,
        avatar_url: Option<String>,
        email_verified: bool,
        two_factor: TwoFactorStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            avatar_url,
            email_verified,
            two_factor,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn email_verified(&self) -> bool {
        self.email_verified
    }

    pub fn two_factor(&self) -> &TwoFactorStatus {
        &self.two_factor
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
