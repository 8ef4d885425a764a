use chrono::{DateTime, Duration, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

use super::user::UserId;

const SESSION_TOKEN_LENGTH: usize = 48;

/// Opaque session token. Unguessable; the server-side record it names is
/// the sole source of truth about the session's state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let token = rand::rng()
            .sample_iter(Alphanumeric)
            .take(SESSION_TOKEN_LENGTH)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn parse(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Primary factor verified, second factor outstanding. Grants no
    /// access to protected resources.
    PendingTwoFactor,
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    token: SessionToken,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
    state: SessionState,
}

impl Session {
    pub fn new(user_id: UserId, state: SessionState, time_to_live: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token: SessionToken::generate(),
            user_id,
            created_at,
            expires_at: created_at + time_to_live,
            revoked: false,
            state,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Clear the pending-second-factor marker. No-op on an already
    /// active session.
    pub fn promote(&mut self) {
        self.state = SessionState::Active;
    }
}
