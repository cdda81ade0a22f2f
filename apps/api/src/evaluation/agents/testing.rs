//! Scripted LLM for evaluator and panel tests.
//!
//! Replies are routed by a marker found in the system prompt: each agent's role
//! text names the agent ("Resume Agent", ..., "Consensus Agent").

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::evaluation::models::{AgentKind, AgentResult};
use crate::evaluation::scoring::score_to_recommendation;
use crate::llm_client::{LlmCapability, LlmError};

pub const CONSENSUS_MARKER: &str = "Consensus Agent";

enum Reply {
    Text(String),
    Fail,
    Panic,
    Delayed(Duration, String),
}

#[derive(Default)]
pub struct MockLlm {
    replies: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, kind: AgentKind, text: impl Into<String>) -> Self {
        self.reply_to(kind.display_name(), text)
    }

    pub fn reply_to(mut self, marker: &str, text: impl Into<String>) -> Self {
        self.replies.push((marker.to_string(), Reply::Text(text.into())));
        self
    }

    pub fn fail(self, kind: AgentKind) -> Self {
        self.fail_marker(kind.display_name())
    }

    pub fn fail_marker(mut self, marker: &str) -> Self {
        self.replies.push((marker.to_string(), Reply::Fail));
        self
    }

    pub fn panic_marker(mut self, marker: &str) -> Self {
        self.replies.push((marker.to_string(), Reply::Panic));
        self
    }

    pub fn delay(mut self, kind: AgentKind, after: Duration, text: impl Into<String>) -> Self {
        self.replies.push((
            kind.display_name().to_string(),
            Reply::Delayed(after, text.into()),
        ));
        self
    }

    /// Markers of every call received, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmCapability for MockLlm {
    async fn complete(&self, system: &str, _prompt: &str) -> Result<String, LlmError> {
        let Some((marker, reply)) = self.replies.iter().find(|(m, _)| system.contains(m.as_str()))
        else {
            return Err(LlmError::EmptyContent);
        };
        self.calls.lock().unwrap().push(marker.clone());

        match reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(LlmError::Api {
                provider: "mock",
                status: 503,
                message: format!("{marker} unavailable"),
            }),
            Reply::Panic => panic!("mock LLM panicked for {marker}"),
            Reply::Delayed(after, text) => {
                tokio::time::sleep(*after).await;
                Ok(text.clone())
            }
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// A well-formed agent reply with a 0–100 (or fractional) score.
pub fn agent_reply(score: f64, recommendation: &str) -> String {
    json!({
        "score": score,
        "strengths": ["Relevant backend experience"],
        "concerns": [],
        "recommendation": recommendation,
        "reasoning": "Scripted reply."
    })
    .to_string()
}

pub fn sample_result(kind: AgentKind, score: f64) -> AgentResult {
    AgentResult {
        agent_name: kind.display_name().to_string(),
        kind,
        score,
        strengths: vec![],
        concerns: vec![],
        gaps: vec![],
        contradictions: vec![],
        recommendation: score_to_recommendation(score),
        reasoning: String::new(),
    }
}
