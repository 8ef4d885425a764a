use std::sync::Arc;

use chrono::Utc;
use redis::{Commands, Connection};
use tokio::sync::Mutex;
use veridian_core::{
    Session, SessionState, SessionStore, SessionStoreError, SessionToken, UserId,
};

use super::retry::retry_once_redis;

/// Session store backed by Redis. Sessions are stored as JSON under a
/// prefixed key with a TTL matching their expiry; a per-user set of
/// token values supports bulk revocation.
///
/// All commands go through one mutex-guarded connection, so the
/// read-modify-write in `promote` is serialized process-wide. Dropped
/// or broken connections get one retry before the error surfaces.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: Arc<Mutex<Connection>>,
}

impl RedisSessionStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    async fn write_session(
        conn: &mut Connection,
        session: &Session,
    ) -> Result<(), SessionStoreError> {
        let ttl = (session.expires_at() - Utc::now()).num_seconds().max(1) as u64;
        let json = serde_json::to_string(session)
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;
        let key = session_key(session.token());
        retry_once_redis(conn, |conn| conn.set_ex::<_, _, ()>(&key, &json, ttl))
            .await
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
    }

    async fn read_session(
        conn: &mut Connection,
        token: &SessionToken,
    ) -> Result<Option<Session>, SessionStoreError> {
        let key = session_key(token);
        let json: Option<String> = retry_once_redis(conn, |conn| conn.get(&key))
            .await
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;
        json.map(|j| {
            serde_json::from_str(&j)
                .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
        })
        .transpose()
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    #[tracing::instrument(name = "Inserting session into Redis", skip_all)]
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.lock().await;
        Self::write_session(&mut conn, &session).await?;
        let key = user_sessions_key(session.user_id());
        retry_once_redis(&mut *conn, |conn| {
            conn.sadd::<_, _, ()>(&key, session.token().as_str())
        })
        .await
        .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Fetching session from Redis", skip_all)]
    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, SessionStoreError> {
        let mut conn = self.conn.lock().await;
        Self::read_session(&mut conn, token).await
    }

    #[tracing::instrument(name = "Promoting session in Redis", skip_all)]
    async fn promote(&self, token: &SessionToken) -> Result<Session, SessionStoreError> {
        let mut conn = self.conn.lock().await;

        let mut session = Self::read_session(&mut conn, token)
            .await?
            .ok_or(SessionStoreError::NotFound)?;
        if session.is_revoked() || session.state() != SessionState::PendingTwoFactor {
            return Err(SessionStoreError::NotPending);
        }

        session.promote();
        Self::write_session(&mut conn, &session).await?;
        Ok(session)
    }

    #[tracing::instrument(name = "Revoking session in Redis", skip_all)]
    async fn revoke(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.lock().await;

        if let Some(mut session) = Self::read_session(&mut conn, token).await? {
            session.revoke();
            Self::write_session(&mut conn, &session).await?;
        }
        Ok(())
    }

    #[tracing::instrument(name = "Revoking all sessions for user in Redis", skip_all)]
    async fn revoke_all_for_user(
        &self,
        user_id: &UserId,
        except: Option<&SessionToken>,
    ) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.lock().await;

        let key = user_sessions_key(user_id);
        let tokens: Vec<String> = retry_once_redis(&mut *conn, |conn| conn.smembers(&key))
            .await
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;

        for raw in tokens {
            if except.is_some_and(|t| t.as_str() == raw) {
                continue;
            }
            let token = SessionToken::parse(raw);
            if let Some(mut session) = Self::read_session(&mut conn, &token).await? {
                session.revoke();
                Self::write_session(&mut conn, &session).await?;
            }
        }
        Ok(())
    }
}

const SESSION_KEY_PREFIX: &str = "session:";
const USER_SESSIONS_KEY_PREFIX: &str = "user_sessions:";

fn session_key(token: &SessionToken) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, token.as_str())
}

fn user_sessions_key(user_id: &UserId) -> String {
    format!("{}{}", USER_SESSIONS_KEY_PREFIX, user_id)
}
