//! Claim Agent: cross-verifies resume claims against the interview transcript.
//!
//! The heuristic contradiction pass runs first and is shown to the model as
//! candidates. Without a transcript there is nothing to verify against, so the
//! agent returns an unscored result instead of calling the model.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::evaluation::agents::prompts::{agent_prompt, system_prompt, CLAIM_FOCUS, CLAIM_ROLE};
use crate::evaluation::agents::Evaluator;
use crate::evaluation::matching::{find_contradictions, split_statements, ContradictionCandidate};
use crate::evaluation::models::{AgentKind, AgentResult, EvaluationRequest, Recommendation};

pub const CLAIMS_UNVERIFIED: &str =
    "No interview transcript provided; resume claims could not be verified";

pub struct ClaimAgent<'a> {
    request: &'a EvaluationRequest,
    candidates: Vec<ContradictionCandidate>,
}

impl<'a> ClaimAgent<'a> {
    pub fn new(request: &'a EvaluationRequest) -> Self {
        let candidates = if request.has_transcript() {
            find_contradictions(
                &split_statements(&request.resume),
                &split_statements(&request.transcript),
            )
        } else {
            vec![]
        };
        Self {
            request,
            candidates,
        }
    }

    /// Score 0 keeps this result out of the vote and out of the confidence count.
    fn unverified(&self) -> AgentResult {
        AgentResult {
            agent_name: AgentKind::Claim.display_name().to_string(),
            kind: AgentKind::Claim,
            score: 0.0,
            strengths: vec![],
            concerns: vec![CLAIMS_UNVERIFIED.to_string()],
            gaps: vec![],
            contradictions: vec![],
            recommendation: Recommendation::NoHire,
            reasoning: CLAIMS_UNVERIFIED.to_string(),
        }
    }
}

fn describe(candidate: &ContradictionCandidate) -> String {
    format!(
        "Resume: \"{}\" vs interview: \"{}\" ({})",
        candidate.statement_a,
        candidate.statement_b,
        candidate.conflicting_keywords.join(", ")
    )
}

#[async_trait]
impl Evaluator for ClaimAgent<'_> {
    fn kind(&self) -> AgentKind {
        AgentKind::Claim
    }

    fn system_prompt(&self) -> String {
        system_prompt(CLAIM_ROLE)
    }

    fn user_prompt(&self) -> String {
        let extra = if self.candidates.is_empty() {
            String::new()
        } else {
            let listed: Vec<String> = self
                .candidates
                .iter()
                .map(|c| format!("- {}", describe(c)))
                .collect();
            format!(
                "\nHEURISTIC CANDIDATES (numbers differ; confirm or dismiss each):\n{}\n",
                listed.join("\n")
            )
        };
        agent_prompt(self.request, CLAIM_FOCUS, &extra)
    }

    /// Contradictions are always populated when the model omits the field.
    fn finalize(&self, mut result: AgentResult, raw: &Map<String, Value>) -> AgentResult {
        if !raw.contains_key("contradictions") {
            result.contradictions = self.candidates.iter().map(describe).collect();
        }
        result
    }

    fn short_circuit(&self) -> Option<AgentResult> {
        (!self.request.has_transcript()).then(|| self.unverified())
    }
}
