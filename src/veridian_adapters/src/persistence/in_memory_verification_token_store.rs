use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use veridian_core::{
    ConsumedToken, TokenPurpose, VerificationToken, VerificationTokenStore,
    VerificationTokenStoreError,
};

/// Verification tokens keyed by their opaque value. The single-use flip
/// happens under the entry's shard lock.
#[derive(Default, Clone)]
pub struct InMemoryVerificationTokenStore {
    tokens: Arc<DashMap<String, VerificationToken>>,
}

impl InMemoryVerificationTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for InMemoryVerificationTokenStore {
    async fn insert(&self, token: VerificationToken) -> Result<(), VerificationTokenStoreError> {
        // Every signup and account action mints a token, so expired ones
        // must not linger. Within their lifetime, consumed tokens stay
        // so a resubmission still reports AlreadyConsumed.
        let now = Utc::now();
        self.tokens.retain(|_, outstanding| !outstanding.is_expired(now));
        self.tokens.insert(token.value().to_string(), token);
        Ok(())
    }

    async fn consume(
        &self,
        value: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<ConsumedToken, VerificationTokenStoreError> {
        let mut entry = self
            .tokens
            .get_mut(value)
            .ok_or(VerificationTokenStoreError::NotFound)?;
        entry.consume(purpose, now)?;
        Ok(ConsumedToken {
            user_id: *entry.user_id(),
            payload: entry.payload().map(str::to_string),
        })
    }
}
