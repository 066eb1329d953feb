use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands};

use crate::domain::repository::SessionStore;
use crate::domain::types::SessionRecord;
use crate::error::ApiError;

#[derive(Clone)]
pub struct RedisSessionStore {
    pub pool: Pool,
}

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

impl RedisSessionStore {
    async fn conn(&self) -> Result<deadpool_redis::Connection, ApiError> {
        self.pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))
    }

    /// Round-trip `PING` for the readiness probe.
    pub async fn ping(&self) -> bool {
        let Ok(mut conn) = self.pool.get().await else {
            return false;
        };
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .is_ok()
    }
}

impl SessionStore for RedisSessionStore {
    async fn put(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), ApiError> {
        let value = serde_json::to_string(record).context("encode session record")?;
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(session_key(session_id), value, ttl_secs)
            .await
            .map_err(|e: redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, ApiError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(|e: redis::RedisError| ApiError::Internal(e.into()))?;
        match value {
            Some(json) => match serde_json::from_str(&json) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    // Written by an older release; treat as signed out.
                    tracing::warn!(error = %e, "undecodable session record");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &str) -> Result<(), ApiError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .del(session_key(session_id))
            .await
            .map_err(|e: redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }
}
