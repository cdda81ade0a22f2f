//! Consensus step: runs after the panel settles and narrates the combined outcome.

use serde_json::Value;
use tracing::warn;

use crate::evaluation::agents::prompts::{system_prompt, CONSENSUS_PROMPT_TEMPLATE, CONSENSUS_ROLE};
use crate::evaluation::agents::{parse_json_object, string_list, AgentError};
use crate::evaluation::matching::{find_consensus_items, FindingField};
use crate::evaluation::models::{AgentResult, Consensus};
use crate::llm_client::LlmCapability;

/// Findings must come from this many agents to appear in the fallback lists.
const FALLBACK_MIN_AGENTS: usize = 2;

pub struct ConsensusAgent<'a> {
    outputs: &'a [AgentResult],
}

impl<'a> ConsensusAgent<'a> {
    pub fn new(outputs: &'a [AgentResult]) -> Self {
        Self { outputs }
    }

    pub fn user_prompt(&self) -> Result<String, AgentError> {
        let outputs_json =
            serde_json::to_string_pretty(self.outputs).map_err(AgentError::Prompt)?;
        Ok(CONSENSUS_PROMPT_TEMPLATE.replace("{agent_outputs_json}", &outputs_json))
    }

    pub async fn summarize(&self, llm: &dyn LlmCapability) -> Result<Consensus, AgentError> {
        let prompt = self.user_prompt()?;
        let text = llm.complete(&system_prompt(CONSENSUS_ROLE), &prompt).await?;
        let raw = parse_json_object(&text)?;

        let summary = raw
            .get("summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AgentError::InvalidField("summary"))?;

        Ok(Consensus {
            summary: summary.to_string(),
            strengths: string_list(raw.get("strengths")),
            concerns: string_list(raw.get("concerns")),
        })
    }

    /// Never fails. With no agent outputs, or when the model call fails, the summary
    /// is the fixed unavailable text and the lists come from heuristic clustering.
    pub async fn summarize_or_fallback(&self, llm: &dyn LlmCapability) -> Consensus {
        if self.outputs.is_empty() {
            return self.fallback();
        }
        match self.summarize(llm).await {
            Ok(consensus) => consensus,
            Err(e) => {
                warn!(error = %e, "Consensus step failed, using fallback");
                self.fallback()
            }
        }
    }

    pub fn fallback(&self) -> Consensus {
        Consensus {
            strengths: find_consensus_items(
                self.outputs,
                FindingField::Strengths,
                FALLBACK_MIN_AGENTS,
            ),
            concerns: find_consensus_items(
                self.outputs,
                FindingField::Concerns,
                FALLBACK_MIN_AGENTS,
            ),
            ..Consensus::unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::agents::testing::{sample_result, MockLlm, CONSENSUS_MARKER};
    use crate::evaluation::models::{AgentKind, CONSENSUS_UNAVAILABLE};
    use serde_json::json;

    #[tokio::test]
    async fn test_summarize_parses_reply() {
        let outputs = vec![sample_result(AgentKind::Resume, 8.0)];
        let reply = json!({
            "summary": "Panel leans positive.",
            "strengths": ["Cloud experience"],
            "concerns": []
        });
        let llm = MockLlm::new().reply_to(CONSENSUS_MARKER, reply.to_string());
        let consensus = ConsensusAgent::new(&outputs).summarize(&llm).await.unwrap();
        assert_eq!(consensus.summary, "Panel leans positive.");
        assert_eq!(consensus.strengths, vec!["Cloud experience".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_summary_is_an_error() {
        let outputs = vec![sample_result(AgentKind::Resume, 8.0)];
        let llm = MockLlm::new().reply_to(CONSENSUS_MARKER, json!({"strengths": []}).to_string());
        let err = ConsensusAgent::new(&outputs).summarize(&llm).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidField("summary")));
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_clustered_findings() {
        let mut a = sample_result(AgentKind::Resume, 8.0);
        a.strengths = vec!["Production Kubernetes operations experience".to_string()];
        let mut b = sample_result(AgentKind::Technical, 7.0);
        b.strengths = vec!["Kubernetes operations experience in production".to_string()];
        let outputs = vec![a, b];

        let llm = MockLlm::new().fail_marker(CONSENSUS_MARKER);
        let consensus = ConsensusAgent::new(&outputs)
            .summarize_or_fallback(&llm)
            .await;
        assert_eq!(consensus.summary, CONSENSUS_UNAVAILABLE);
        assert_eq!(
            consensus.strengths,
            vec!["Production Kubernetes operations experience".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_outputs_skips_llm() {
        let llm = MockLlm::new();
        let consensus = ConsensusAgent::new(&[]).summarize_or_fallback(&llm).await;
        assert_eq!(consensus, Consensus::unavailable());
        assert!(llm.calls().is_empty());
    }
}
