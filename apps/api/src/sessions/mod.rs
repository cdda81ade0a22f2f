// Interview sessions: a resume and job description uploaded once, a transcript
// attached later, then evaluated on demand. Sessions expire after a fixed TTL.

pub mod memory;
pub mod redis_store;

pub use memory::InMemorySessionStore;
pub use redis_store::RedisSessionStore;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::evaluation::models::EvaluationRequest;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0} not found or expired")]
    NotFound(Uuid),

    #[error("session serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("session backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: Uuid,
    pub resume: String,
    #[serde(default)]
    pub transcript: String,
    pub job_description: String,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(resume: String, job_description: String, transcript: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume,
            transcript,
            job_description,
            created_at: Utc::now(),
        }
    }

    pub fn to_request(&self) -> EvaluationRequest {
        EvaluationRequest::new(
            self.resume.clone(),
            self.transcript.clone(),
            self.job_description.clone(),
        )
    }
}

/// Keyed session storage. Expired sessions behave exactly like missing ones.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &InterviewSession) -> Result<(), SessionError>;

    async fn get(&self, id: Uuid) -> Result<InterviewSession, SessionError>;

    /// Replaces the transcript without extending the session's lifetime.
    async fn set_transcript(
        &self,
        id: Uuid,
        transcript: String,
    ) -> Result<InterviewSession, SessionError>;

    async fn delete(&self, id: Uuid) -> Result<(), SessionError>;

    fn ttl(&self) -> Duration;
}

fn session_key(id: Uuid) -> String {
    format!("session:{id}")
}
