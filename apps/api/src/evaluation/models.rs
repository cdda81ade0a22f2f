//! Data model shared by the evaluation panel, its evaluators, and the report builder.
//!
//! Field names serialize as camelCase: the browser front-end reads these shapes
//! directly, so renaming a field is a breaking change.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Fixed fallbacks
// ────────────────────────────────────────────────────────────────────────────

/// Final score used when no routed agent produced a valid score.
pub const DEFAULT_FINAL_SCORE: f64 = 50.0;

/// Consensus summary substituted when the consensus step fails.
pub const CONSENSUS_UNAVAILABLE: &str = "Consensus unavailable";

/// Consensus summary used by the catastrophic fallback result.
pub const PANEL_UNAVAILABLE_SUMMARY: &str =
    "Evaluation panel failed unexpectedly; defaulting to a conservative decision.";

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("resume cannot be empty")]
    MissingResume,

    #[error("jobDescription cannot be empty")]
    MissingJobDescription,
}

/// Immutable input to a single evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub resume: String,
    #[serde(default)]
    pub transcript: String,
    pub job_description: String,
}

impl EvaluationRequest {
    pub fn new(
        resume: impl Into<String>,
        transcript: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Self {
        Self {
            resume: resume.into(),
            transcript: transcript.into(),
            job_description: job_description.into(),
        }
    }

    /// Resume and job description are mandatory; an empty transcript is allowed.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.resume.trim().is_empty() {
            return Err(EvaluationError::MissingResume);
        }
        if self.job_description.trim().is_empty() {
            return Err(EvaluationError::MissingJobDescription);
        }
        Ok(())
    }

    pub fn has_transcript(&self) -> bool {
        !self.transcript.trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluator identity
// ────────────────────────────────────────────────────────────────────────────

/// The five evaluator variants. Carried on every `AgentResult` so routing is
/// an exhaustive match rather than a name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Resume,
    Technical,
    Behavioral,
    Claim,
    Skeptic,
}

impl AgentKind {
    /// Dispatch order of the panel.
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Resume,
        AgentKind::Technical,
        AgentKind::Behavioral,
        AgentKind::Claim,
        AgentKind::Skeptic,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            AgentKind::Resume => "Resume Agent",
            AgentKind::Technical => "Technical Agent",
            AgentKind::Behavioral => "Behavioral Agent",
            AgentKind::Claim => "Claim Agent",
            AgentKind::Skeptic => "Skeptic Agent",
        }
    }

    /// The voting role this evaluator fills. The skeptic is narrative-only.
    pub fn scoring_role(self) -> Option<ScoringRole> {
        match self {
            AgentKind::Resume => Some(ScoringRole::Resume),
            AgentKind::Technical => Some(ScoringRole::Technical),
            AgentKind::Behavioral => Some(ScoringRole::Behavioral),
            AgentKind::Claim => Some(ScoringRole::Claims),
            AgentKind::Skeptic => None,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The four roles that contribute to the numeric vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringRole {
    Resume,
    Technical,
    Behavioral,
    Claims,
}

impl ScoringRole {
    pub const ALL: [ScoringRole; 4] = [
        ScoringRole::Resume,
        ScoringRole::Technical,
        ScoringRole::Behavioral,
        ScoringRole::Claims,
    ];
}

// ────────────────────────────────────────────────────────────────────────────
// Labels
// ────────────────────────────────────────────────────────────────────────────

/// Per-evaluator recommendation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    #[serde(rename = "Hire")]
    Hire,
    #[serde(rename = "No Hire")]
    NoHire,
    #[serde(rename = "Strong No Hire")]
    StrongNoHire,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Recommendation::StrongHire => "Strong Hire",
            Recommendation::Hire => "Hire",
            Recommendation::NoHire => "No Hire",
            Recommendation::StrongNoHire => "Strong No Hire",
        }
    }

    /// Case- and separator-insensitive parse of a model-supplied label.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "stronghire" => Some(Recommendation::StrongHire),
            "hire" => Some(Recommendation::Hire),
            "nohire" => Some(Recommendation::NoHire),
            "strongnohire" => Some(Recommendation::StrongNoHire),
            _ => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Binary panel verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Hire")]
    Hire,
    #[serde(rename = "No Hire")]
    NoHire,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Hire => f.write_str("Hire"),
            Verdict::NoHire => f.write_str("No Hire"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

/// Output of one evaluator. `score` is always on the canonical 0–10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub agent_name: String,
    pub kind: AgentKind,
    pub score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub contradictions: Vec<String>,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consensus {
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

impl Consensus {
    pub fn unavailable() -> Self {
        Self {
            summary: CONSENSUS_UNAVAILABLE.to_string(),
            strengths: vec![],
            concerns: vec![],
        }
    }
}

/// Aggregate of one panel run. Always structurally complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelResult {
    /// Successful evaluator outputs only, in dispatch order.
    pub agent_outputs: Vec<AgentResult>,
    pub failed_agents: Vec<String>,
    /// Mean of routed percentages, 0–100.
    pub final_score: f64,
    /// Share of the four voting roles that produced a valid score, 0–100.
    pub confidence_level: u32,
    /// Majority-vote verdict.
    pub recommendation: Verdict,
    /// Canonical 0–10 score per voting role.
    pub agent_scores: BTreeMap<ScoringRole, f64>,
    /// Role-weighted canonical 0–10 score.
    pub weighted_score: f64,
    /// Ladder label for `weighted_score`.
    pub threshold_recommendation: Recommendation,
    pub consensus: Consensus,
}

impl PanelResult {
    /// The conservative result returned when the pipeline itself breaks.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            agent_outputs: vec![],
            failed_agents: vec![reason.into()],
            final_score: DEFAULT_FINAL_SCORE,
            confidence_level: 0,
            recommendation: Verdict::NoHire,
            agent_scores: BTreeMap::new(),
            weighted_score: 0.0,
            threshold_recommendation: Recommendation::StrongNoHire,
            consensus: Consensus {
                summary: PANEL_UNAVAILABLE_SUMMARY.to_string(),
                strengths: vec![],
                concerns: vec![],
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Audit trail and report
// ────────────────────────────────────────────────────────────────────────────

/// One entry in the decision trace. Serialized without a tag so each entry is
/// `{agent, score, recommendation}`, `{conflict}`, or `{finalDecision}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceEntry {
    Agent {
        agent: String,
        score: f64,
        recommendation: Recommendation,
    },
    Conflict {
        conflict: String,
    },
    FinalDecision {
        #[serde(rename = "finalDecision")]
        final_decision: Verdict,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAssessment {
    pub verdict: Verdict,
    pub summary: String,
    pub average_score: f64,
    pub confidence_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub agent: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub agent: String,
    pub score: f64,
}

/// Externally returned report shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    pub candidate_assessment: CandidateAssessment,
    pub discrepancy_log: Vec<Discrepancy>,
    pub agent_interaction_trace: Vec<TraceEntry>,
    pub failed_agents: Vec<String>,
    pub chart_data: Vec<ChartPoint>,
    pub raw_agent_outputs: Vec<AgentResult>,
    pub consensus: Consensus,
}
