//! Evaluators: the five panel agents plus the consensus step.
//!
//! Every agent builds its own prompt, sends it through `LlmCapability`, and parses
//! the reply into an `AgentResult`. Parsing is lenient for list fields and strict
//! for the score: a reply without a usable score fails that agent only.

pub mod behavioral;
pub mod claim;
pub mod consensus;
pub mod prompts;
pub mod resume;
pub mod skeptic;
pub mod technical;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::evaluation::models::{AgentKind, AgentResult, EvaluationRequest, Recommendation};
use crate::evaluation::scoring::{
    coerce_number, normalize_score, percent_from_raw, score_to_recommendation, PERCENT_MAX,
};
use crate::llm_client::{strip_json_fences, LlmCapability, LlmError};

pub use behavioral::BehavioralAgent;
pub use claim::ClaimAgent;
pub use consensus::ConsensusAgent;
pub use resume::ResumeAgent;
pub use skeptic::SkepticAgent;
pub use technical::TechnicalAgent;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("response was not valid JSON: {0}")]
    Unparseable(#[source] serde_json::Error),

    #[error("response field '{0}' is missing or invalid")]
    InvalidField(&'static str),

    #[error("failed to build prompt: {0}")]
    Prompt(#[source] serde_json::Error),

    #[error("timed out after {0}s")]
    Timeout(u64),
}

/// Contract shared by all panel agents.
///
/// Variants differ only in their prompts and in `finalize`, which fills the
/// fields that variant guarantees (gaps for the resume agent, contradictions
/// for the claim agent).
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn system_prompt(&self) -> String;

    fn user_prompt(&self) -> String;

    /// Adjusts the parsed result. `raw` is the reply object as the model sent it.
    fn finalize(&self, result: AgentResult, _raw: &Map<String, Value>) -> AgentResult {
        result
    }

    /// Returns a result without calling the model when the agent has nothing to
    /// judge. The default always calls the model.
    fn short_circuit(&self) -> Option<AgentResult> {
        None
    }

    async fn evaluate(&self, llm: &dyn LlmCapability) -> Result<AgentResult, AgentError> {
        if let Some(result) = self.short_circuit() {
            return Ok(result);
        }
        let text = llm
            .complete(&self.system_prompt(), &self.user_prompt())
            .await?;
        let raw = parse_json_object(&text)?;
        let result = agent_result_from_json(self.kind(), &raw)?;
        Ok(self.finalize(result, &raw))
    }
}

/// Builds the panel agent for `kind` over one request.
pub fn build_agent(kind: AgentKind, request: &EvaluationRequest) -> Box<dyn Evaluator + '_> {
    match kind {
        AgentKind::Resume => Box::new(ResumeAgent::new(request)),
        AgentKind::Technical => Box::new(TechnicalAgent::new(request)),
        AgentKind::Behavioral => Box::new(BehavioralAgent::new(request)),
        AgentKind::Claim => Box::new(ClaimAgent::new(request)),
        AgentKind::Skeptic => Box::new(SkepticAgent::new(request)),
    }
}

/// Parses model text (optionally fenced) into a JSON object.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, AgentError> {
    let value: Value =
        serde_json::from_str(strip_json_fences(text)).map_err(AgentError::Unparseable)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AgentError::InvalidField("root object")),
    }
}

/// Maps a reply object onto `AgentResult`.
///
/// The score is read with the dual-scale rule and stored on 0–10. An unknown or
/// missing recommendation label is replaced by the ladder label for that score.
pub fn agent_result_from_json(
    kind: AgentKind,
    raw: &Map<String, Value>,
) -> Result<AgentResult, AgentError> {
    let raw_score = raw
        .get("score")
        .and_then(coerce_number)
        .ok_or(AgentError::InvalidField("score"))?;
    let score = normalize_score(percent_from_raw(raw_score), 0.0, PERCENT_MAX);

    let recommendation = raw
        .get("recommendation")
        .and_then(Value::as_str)
        .and_then(Recommendation::parse_label)
        .unwrap_or_else(|| score_to_recommendation(score));

    Ok(AgentResult {
        agent_name: kind.display_name().to_string(),
        kind,
        score,
        strengths: string_list(raw.get("strengths")),
        concerns: string_list(raw.get("concerns")),
        gaps: string_list(raw.get("gaps")),
        contradictions: string_list(raw.get("contradictions")),
        recommendation,
        reasoning: raw
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
    })
}

/// Lenient list reader: arrays keep their non-empty scalar items, a lone string
/// becomes a one-item list, anything else is empty.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(_)) => value.and_then(scalar_text).into_iter().collect(),
        _ => vec![],
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_json_object_accepts_fenced_reply() {
        let raw = parse_json_object("```json\n{\"score\": 80}\n```").unwrap();
        assert_eq!(raw["score"], json!(80));
    }

    #[test]
    fn test_parse_json_object_rejects_prose() {
        assert!(matches!(
            parse_json_object("The candidate looks great!"),
            Err(AgentError::Unparseable(_))
        ));
    }

    #[test]
    fn test_parse_json_object_rejects_arrays() {
        assert!(matches!(
            parse_json_object("[1, 2]"),
            Err(AgentError::InvalidField("root object"))
        ));
    }

    #[test]
    fn test_result_from_percentage_score() {
        let raw = object(json!({
            "score": 85,
            "strengths": ["Owns production services"],
            "recommendation": "Strong Hire",
            "reasoning": "  Solid.  "
        }));
        let result = agent_result_from_json(AgentKind::Technical, &raw).unwrap();
        assert_eq!(result.agent_name, "Technical Agent");
        assert_eq!(result.score, 8.5);
        assert_eq!(result.recommendation, Recommendation::StrongHire);
        assert_eq!(result.reasoning, "Solid.");
        assert!(result.concerns.is_empty());
    }

    #[test]
    fn test_result_from_fractional_score() {
        let raw = object(json!({"score": 0.62, "recommendation": "No Hire"}));
        let result = agent_result_from_json(AgentKind::Resume, &raw).unwrap();
        assert_eq!(result.score, 6.2);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let raw = object(json!({"score": 250, "recommendation": "Hire"}));
        let result = agent_result_from_json(AgentKind::Resume, &raw).unwrap();
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn test_missing_score_fails() {
        let raw = object(json!({"recommendation": "Hire"}));
        assert!(matches!(
            agent_result_from_json(AgentKind::Resume, &raw),
            Err(AgentError::InvalidField("score"))
        ));
    }

    #[test]
    fn test_non_numeric_score_fails() {
        let raw = object(json!({"score": "excellent"}));
        assert!(agent_result_from_json(AgentKind::Resume, &raw).is_err());
    }

    #[test]
    fn test_unknown_recommendation_is_coerced_from_score() {
        let raw = object(json!({"score": "70", "recommendation": "Lean hire maybe"}));
        let result = agent_result_from_json(AgentKind::Behavioral, &raw).unwrap();
        assert_eq!(result.score, 7.0);
        assert_eq!(result.recommendation, Recommendation::Hire);
    }

    #[test]
    fn test_malformed_lists_degrade_to_empty() {
        let raw = object(json!({
            "score": 50,
            "strengths": {"nested": true},
            "concerns": "Only one concern",
            "gaps": [null, "", "Kubernetes", 3]
        }));
        let result = agent_result_from_json(AgentKind::Resume, &raw).unwrap();
        assert!(result.strengths.is_empty());
        assert_eq!(result.concerns, vec!["Only one concern".to_string()]);
        assert_eq!(result.gaps, vec!["Kubernetes".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_build_agent_matches_kind() {
        let request = EvaluationRequest::new("resume", "", "jd");
        let kinds: Vec<AgentKind> = AgentKind::ALL
            .into_iter()
            .map(|kind| build_agent(kind, &request).kind())
            .collect();
        assert_eq!(kinds, AgentKind::ALL.to_vec());
    }
}
