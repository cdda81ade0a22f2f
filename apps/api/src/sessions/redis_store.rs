use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;
use uuid::Uuid;

use super::{session_key, InterviewSession, SessionError, SessionStore};

impl From<redis::RedisError> for SessionError {
    fn from(e: redis::RedisError) -> Self {
        SessionError::Backend(e.to_string())
    }
}

/// Sessions stored as JSON under `session:<uuid>`, expired by Redis itself.
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl: Duration,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis session store connected");
        Ok(Self { conn, ttl })
    }
}

/// Redis rejects `EX 0`; sub-second TTLs round up to one second.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session: &InterviewSession) -> Result<(), SessionError> {
        let value = serde_json::to_string(session)?;
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(session_key(session.id))
            .arg(value)
            .arg("EX")
            .arg(expiry_secs(self.ttl))
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<InterviewSession, SessionError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(session_key(id)).await?;
        let value = value.ok_or(SessionError::NotFound(id))?;
        Ok(serde_json::from_str(&value)?)
    }

    async fn set_transcript(
        &self,
        id: Uuid,
        transcript: String,
    ) -> Result<InterviewSession, SessionError> {
        let mut session = self.get(id).await?;
        session.transcript = transcript;
        let value = serde_json::to_string(&session)?;

        // XX: only if it still exists; KEEPTTL: keep the original expiry
        let mut conn = self.conn.clone();
        let written: Option<String> = redis::cmd("SET")
            .arg(session_key(id))
            .arg(value)
            .arg("KEEPTTL")
            .arg("XX")
            .query_async(&mut conn)
            .await?;
        written.map(|_| session).ok_or(SessionError::NotFound(id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(session_key(id)).await?;
        if removed == 0 {
            return Err(SessionError::NotFound(id));
        }
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
