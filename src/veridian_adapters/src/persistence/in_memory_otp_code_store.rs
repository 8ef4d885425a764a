use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use veridian_core::{OneTimeCode, OtpCode, OtpCodeStore, OtpCodeStoreError, UserId};

/// One live code per user; the newest `put` silently replaces the old
/// one. Consumption mutates the record under its shard lock.
#[derive(Default, Clone)]
pub struct InMemoryOtpCodeStore {
    codes: Arc<DashMap<UserId, OneTimeCode>>,
}

impl InMemoryOtpCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OtpCodeStore for InMemoryOtpCodeStore {
    async fn put(&self, code: OneTimeCode) -> Result<(), OtpCodeStoreError> {
        // Expired records carry no replay state worth keeping, and
        // without a sweep the map grows with every user ever issued a
        // code. Consumed-but-unexpired records stay so a replay still
        // reports AlreadyConsumed.
        let now = Utc::now();
        self.codes.retain(|_, outstanding| !outstanding.is_expired(now));
        self.codes.insert(*code.user_id(), code);
        Ok(())
    }

    async fn consume(
        &self,
        user_id: &UserId,
        submitted: &OtpCode,
        now: DateTime<Utc>,
    ) -> Result<(), OtpCodeStoreError> {
        let mut entry = self
            .codes
            .get_mut(user_id)
            .ok_or(OtpCodeStoreError::NotFound)?;
        entry.verify(submitted, now)?;
        Ok(())
    }
}
