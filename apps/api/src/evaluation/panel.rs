//! Panel Orchestrator: fans a request out to every evaluator and folds the results
//! into one `PanelResult`.
//!
//! Flow: validate → dispatch (settle-all, per-agent timeout) → triage → route →
//! aggregate → vote → confidence → consensus.
//!
//! Once dispatch starts the panel never returns an error. Each evaluator and the
//! consensus step run in their own task: an agent's error, timeout or panic lands
//! in `failed_agents`, and a consensus failure falls back to a fixed summary.
//! Anything that still escapes becomes `PanelResult::fallback`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::evaluation::agents::{build_agent, AgentError, ConsensusAgent};
use crate::evaluation::models::{
    AgentKind, AgentResult, Consensus, EvaluationError, EvaluationRequest, PanelResult,
    ScoringRole, Verdict, DEFAULT_FINAL_SCORE,
};
use crate::evaluation::scoring::{
    calculate_weighted_score, canonical_to_percent, normalize_score, recommendation_by_threshold,
    round1, CANONICAL_MAX,
};
use crate::llm_client::LlmCapability;

/// A routed agent votes "hire" at or above this percentage.
pub const HIRE_VOTE_THRESHOLD: f64 = 60.0;
/// Hire votes needed for a "Hire" verdict.
pub const REQUIRED_HIRE_VOTES: usize = 3;
/// Roles expected to contribute to the vote.
pub const VOTING_ROLES: usize = ScoringRole::ALL.len();

const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(90);

/// Per-role weights for the threshold policy. Missing roles drop out of the mean.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleWeights {
    pub resume: f64,
    pub technical: f64,
    pub behavioral: f64,
    pub claims: f64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            resume: 0.25,
            technical: 0.30,
            behavioral: 0.25,
            claims: 0.20,
        }
    }
}

impl RoleWeights {
    pub fn as_map(&self) -> BTreeMap<ScoringRole, f64> {
        BTreeMap::from([
            (ScoringRole::Resume, self.resume),
            (ScoringRole::Technical, self.technical),
            (ScoringRole::Behavioral, self.behavioral),
            (ScoringRole::Claims, self.claims),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Expiry counts as that agent's failure.
    pub agent_timeout: Duration,
    pub role_weights: RoleWeights,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
            role_weights: RoleWeights::default(),
        }
    }
}

/// Entry point. The only error is input validation, raised before any agent runs.
pub async fn run_panel_evaluation(
    llm: Arc<dyn LlmCapability>,
    request: EvaluationRequest,
    config: &PanelConfig,
) -> Result<PanelResult, EvaluationError> {
    request.validate()?;

    let config = config.clone();
    let request = Arc::new(request);
    let pipeline = tokio::spawn(async move { run_pipeline(llm, request, &config).await });

    match pipeline.await {
        Ok(result) => Ok(result),
        Err(e) => {
            let reason = join_failure_reason(e);
            error!(reason = %reason, "Panel pipeline aborted, returning fallback result");
            Ok(PanelResult::fallback(format!(
                "Panel pipeline failed: {reason}"
            )))
        }
    }
}

async fn run_pipeline(
    llm: Arc<dyn LlmCapability>,
    request: Arc<EvaluationRequest>,
    config: &PanelConfig,
) -> PanelResult {
    // Step 1: Dispatch. Each agent runs in its own task so a panic stays local
    info!("Dispatching {} evaluators", AgentKind::ALL.len());

    let timeout = config.agent_timeout;
    let handles: Vec<JoinHandle<Result<AgentResult, AgentError>>> = AgentKind::ALL
        .into_iter()
        .map(|kind| {
            let llm = llm.clone();
            let request = request.clone();
            tokio::spawn(async move {
                let agent = build_agent(kind, &request);
                match tokio::time::timeout(timeout, agent.evaluate(llm.as_ref())).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(AgentError::Timeout(timeout.as_secs())),
                }
            })
        })
        .collect();
    let settled = AgentKind::ALL.into_iter().zip(join_all(handles).await);

    // Step 2: Triage
    let mut agent_outputs = Vec::new();
    let mut failed_agents = Vec::new();
    for (kind, joined) in settled {
        match joined {
            Ok(Ok(result)) => agent_outputs.push(result),
            Ok(Err(e)) => {
                warn!(agent = %kind, error = %e, "Evaluator failed");
                failed_agents.push(format!("{kind}: {e}"));
            }
            Err(e) => {
                let reason = join_failure_reason(e);
                error!(agent = %kind, reason = %reason, "Evaluator task aborted");
                failed_agents.push(format!("{kind}: {reason}"));
            }
        }
    }

    // Step 3: Routing
    let agent_scores = route_scores(&agent_outputs);
    let percentages: BTreeMap<ScoringRole, f64> = agent_scores
        .iter()
        .map(|(role, score)| (*role, canonical_to_percent(*score)))
        .collect();

    // Steps 4–6: Aggregation, voting, confidence
    let final_score = aggregate_final_score(&percentages);
    let recommendation = recommendation_by_majority_vote(&percentages);
    let confidence_level = confidence_level(&percentages);

    let valid_scores: BTreeMap<ScoringRole, f64> = agent_scores
        .iter()
        .filter(|(_, score)| is_valid_score(**score))
        .map(|(role, score)| (*role, *score))
        .collect();
    let weighted_score = round1(calculate_weighted_score(
        &valid_scores,
        &config.role_weights.as_map(),
    ));
    let threshold_recommendation = recommendation_by_threshold(weighted_score);

    // Step 7: Consensus narrative
    let consensus = run_consensus(llm, &agent_outputs).await;

    info!(
        final_score,
        confidence_level,
        verdict = %recommendation,
        failed = failed_agents.len(),
        "Panel evaluation complete"
    );

    PanelResult {
        agent_outputs,
        failed_agents,
        final_score,
        confidence_level,
        recommendation,
        agent_scores,
        weighted_score,
        threshold_recommendation,
        consensus,
    }
}

/// Runs the consensus step in its own task; a panic there yields the fallback
/// narrative and keeps every agent result.
async fn run_consensus(llm: Arc<dyn LlmCapability>, outputs: &[AgentResult]) -> Consensus {
    let owned = outputs.to_vec();
    let task = tokio::spawn(async move {
        ConsensusAgent::new(&owned)
            .summarize_or_fallback(llm.as_ref())
            .await
    });
    match task.await {
        Ok(consensus) => consensus,
        Err(e) => {
            let reason = join_failure_reason(e);
            error!(reason = %reason, "Consensus task aborted, using fallback");
            ConsensusAgent::new(outputs).fallback()
        }
    }
}

/// Canonical score per voting role. Narrative-only agents are skipped; if a role
/// somehow appears twice, the first result wins.
pub fn route_scores(outputs: &[AgentResult]) -> BTreeMap<ScoringRole, f64> {
    let mut routed = BTreeMap::new();
    for result in outputs {
        match result.kind.scoring_role() {
            Some(role) => {
                routed
                    .entry(role)
                    .or_insert_with(|| normalize_score(result.score, 0.0, CANONICAL_MAX));
            }
            None => debug!(agent = %result.kind, "Narrative-only agent excluded from vote"),
        }
    }
    routed
}

/// Mean of the routed percentages that are present and above zero.
/// Falls back to `DEFAULT_FINAL_SCORE` when none qualify.
pub fn aggregate_final_score(percentages: &BTreeMap<ScoringRole, f64>) -> f64 {
    let valid: Vec<f64> = percentages
        .values()
        .copied()
        .filter(|p| is_valid_score(*p))
        .collect();
    if valid.is_empty() {
        return DEFAULT_FINAL_SCORE;
    }
    round1(valid.iter().sum::<f64>() / valid.len() as f64)
}

/// Majority policy: "Hire" only when at least `REQUIRED_HIRE_VOTES` routed agents
/// individually reach `HIRE_VOTE_THRESHOLD`. The average plays no part.
pub fn recommendation_by_majority_vote(percentages: &BTreeMap<ScoringRole, f64>) -> Verdict {
    let hire_votes = percentages
        .values()
        .filter(|p| **p >= HIRE_VOTE_THRESHOLD)
        .count();
    if hire_votes >= REQUIRED_HIRE_VOTES {
        Verdict::Hire
    } else {
        Verdict::NoHire
    }
}

/// Percentage of voting roles that produced a valid score.
pub fn confidence_level(percentages: &BTreeMap<ScoringRole, f64>) -> u32 {
    let contributing = percentages.values().filter(|p| is_valid_score(**p)).count();
    (100.0 * contributing as f64 / VOTING_ROLES as f64).round() as u32
}

fn is_valid_score(score: f64) -> bool {
    score.is_finite() && score > 0.0
}

fn join_failure_reason(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
