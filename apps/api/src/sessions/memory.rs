use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::{InterviewSession, SessionError, SessionStore};

struct Entry {
    session: InterviewSession,
    expires_at: Instant,
}

/// Process-local store used when no Redis URL is configured.
/// Expired entries are evicted on access and whenever a new session is inserted.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &InterviewSession) -> Result<(), SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        if entries.len() < before {
            debug!("Evicted {} expired sessions", before - entries.len());
        }

        entries.insert(
            session.id,
            Entry {
                session: session.clone(),
                expires_at: now + self.ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<InterviewSession, SessionError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(&id) {
                Some(e) if e.expires_at > now => return Ok(e.session.clone()),
                Some(_) => {}
                None => return Err(SessionError::NotFound(id)),
            }
        }
        // Present but expired
        self.entries.write().await.remove(&id);
        Err(SessionError::NotFound(id))
    }

    async fn set_transcript(
        &self,
        id: Uuid,
        transcript: String,
    ) -> Result<InterviewSession, SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get_mut(&id) {
            Some(e) if e.expires_at > now => {
                e.session.transcript = transcript;
                Ok(e.session.clone())
            }
            Some(_) => {
                entries.remove(&id);
                Err(SessionError::NotFound(id))
            }
            None => Err(SessionError::NotFound(id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), SessionError> {
        let now = Instant::now();
        match self.entries.write().await.remove(&id) {
            Some(e) if e.expires_at > now => Ok(()),
            _ => Err(SessionError::NotFound(id)),
        }
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}
