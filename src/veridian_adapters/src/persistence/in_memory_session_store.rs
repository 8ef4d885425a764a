use std::sync::Arc;

use dashmap::DashMap;
use veridian_core::{
    Session, SessionState, SessionStore, SessionStoreError, SessionToken, UserId,
};

/// Session store backed by process memory. Each entry is mutated under
/// its shard lock, which is what makes `promote` a compare-and-set.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<SessionToken, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        self.sessions.insert(session.token().clone(), session);
        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.get(token).map(|entry| entry.clone()))
    }

    async fn promote(&self, token: &SessionToken) -> Result<Session, SessionStoreError> {
        let mut entry = self
            .sessions
            .get_mut(token)
            .ok_or(SessionStoreError::NotFound)?;

        if entry.is_revoked() || entry.state() != SessionState::PendingTwoFactor {
            return Err(SessionStoreError::NotPending);
        }
        entry.promote();
        Ok(entry.clone())
    }

    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            entry.revoke();
        }
        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionToken>,
    ) -> Result<(), SessionStoreError> {
        for mut entry in self.sessions.iter_mut() {
            if entry.user_id() == user_id && Some(entry.token()) != except {
                entry.revoke();
            }
        }
        Ok(())
    }
}
