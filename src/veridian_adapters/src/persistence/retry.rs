use std::future::Future;
use std::time::Duration;

const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Run `operation` and, when it fails with an error `is_transient`
/// accepts, run it one more time after a short backoff. There is no
/// second retry; a repeat failure surfaces to the caller.
pub(crate) async fn retry_once<T, E, F, Fut>(
    mut operation: F,
    is_transient: fn(&E) -> bool,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    match operation().await {
        Err(error) if is_transient(&error) => {
            tracing::warn!(%error, "transient store error, retrying once");
            tokio::time::sleep(RETRY_BACKOFF).await;
            operation().await
        }
        outcome => outcome,
    }
}

/// Synchronous flavour for redis commands issued over a borrowed
/// connection. The backoff still yields to the runtime between the
/// two attempts.
pub(crate) async fn retry_once_redis<C, T>(
    conn: &mut C,
    mut command: impl FnMut(&mut C) -> Result<T, redis::RedisError>,
) -> Result<T, redis::RedisError> {
    match command(conn) {
        Err(error) if transient_redis(&error) => {
            tracing::warn!(%error, "transient redis error, retrying once");
            tokio::time::sleep(RETRY_BACKOFF).await;
            command(conn)
        }
        outcome => outcome,
    }
}

/// Connection-level failures worth a second attempt. Statement and
/// constraint errors are deterministic and fail straight through.
pub(crate) fn transient_sqlx(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
    )
}

pub(crate) fn transient_redis(error: &redis::RedisError) -> bool {
    error.is_io_error() || error.is_connection_dropped()
}
