use crate::evaluation::models::{AgentResult, TraceEntry, Verdict};

/// Ordered audit trail: one entry per agent in input order, then each conflict,
/// then exactly one final decision.
pub fn build_decision_trace(
    agents: &[AgentResult],
    conflicts: &[String],
    final_decision: Verdict,
) -> Vec<TraceEntry> {
    let mut trace = Vec::with_capacity(agents.len() + conflicts.len() + 1);

    trace.extend(agents.iter().map(|a| TraceEntry::Agent {
        agent: a.agent_name.clone(),
        score: a.score,
        recommendation: a.recommendation,
    }));
    trace.extend(conflicts.iter().map(|c| TraceEntry::Conflict {
        conflict: c.clone(),
    }));
    trace.push(TraceEntry::FinalDecision { final_decision });

    trace
}
