//! Report builder: projects a `PanelResult` into the externally returned shape.
//! Nothing here recomputes scores or verdicts.

use crate::evaluation::conflicts::{detect_conflicts, voting_results};
use crate::evaluation::models::{
    CandidateAssessment, ChartPoint, Discrepancy, FinalReport, PanelResult,
};
use crate::evaluation::trace::build_decision_trace;

pub fn build_final_report(panel: &PanelResult) -> FinalReport {
    let conflicts = detect_conflicts(voting_results(&panel.agent_outputs));
    let agent_interaction_trace =
        build_decision_trace(&panel.agent_outputs, &conflicts, panel.recommendation);

    let discrepancy_log = panel
        .agent_outputs
        .iter()
        .filter(|a| !a.contradictions.is_empty())
        .map(|a| Discrepancy {
            agent: a.agent_name.clone(),
            issues: a.contradictions.clone(),
        })
        .collect();

    // Canonical 0–10 scores, same scale as the trace entries.
    let chart_data = panel
        .agent_outputs
        .iter()
        .map(|a| ChartPoint {
            agent: a.agent_name.clone(),
            score: a.score,
        })
        .collect();

    FinalReport {
        candidate_assessment: CandidateAssessment {
            verdict: panel.recommendation,
            summary: panel.consensus.summary.clone(),
            average_score: panel.final_score,
            confidence_level: panel.confidence_level,
        },
        discrepancy_log,
        agent_interaction_trace,
        failed_agents: panel.failed_agents.clone(),
        chart_data,
        raw_agent_outputs: panel.agent_outputs.clone(),
        consensus: panel.consensus.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::agents::testing::sample_result;
    use crate::evaluation::conflicts::SCORE_DISAGREEMENT;
    use crate::evaluation::models::{
        AgentKind, AgentResult, Consensus, Recommendation, TraceEntry, Verdict,
    };
    use serde_json::json;
    use std::collections::BTreeMap;

    fn panel(outputs: Vec<AgentResult>) -> PanelResult {
        PanelResult {
            agent_outputs: outputs,
            failed_agents: vec!["Technical Agent: timed out after 90s".to_string()],
            final_score: 72.5,
            confidence_level: 75,
            recommendation: Verdict::Hire,
            agent_scores: BTreeMap::new(),
            weighted_score: 7.2,
            threshold_recommendation: Recommendation::Hire,
            consensus: Consensus {
                summary: "Strong backend profile.".to_string(),
                strengths: vec![],
                concerns: vec![],
            },
        }
    }

    #[test]
    fn test_report_projects_panel_result() {
        let mut claim = sample_result(AgentKind::Claim, 4.0);
        claim.contradictions = vec!["Resume says 12 reports, interview says 4".to_string()];
        let outputs = vec![
            sample_result(AgentKind::Resume, 8.5),
            sample_result(AgentKind::Behavioral, 8.0),
            claim,
            sample_result(AgentKind::Skeptic, 2.0),
        ];
        let report = build_final_report(&panel(outputs));

        assert_eq!(report.candidate_assessment.verdict, Verdict::Hire);
        assert_eq!(report.candidate_assessment.average_score, 72.5);
        assert_eq!(report.candidate_assessment.summary, "Strong backend profile.");
        assert_eq!(report.failed_agents.len(), 1);

        assert_eq!(report.discrepancy_log.len(), 1);
        assert_eq!(report.discrepancy_log[0].agent, "Claim Agent");

        assert_eq!(report.chart_data.len(), 4);
        assert_eq!(report.raw_agent_outputs.len(), 4);

        // 4 agents, spread 8.5 - 4.0 and split labels, then the decision
        let trace = &report.agent_interaction_trace;
        assert_eq!(trace.len(), 7);
        assert_eq!(
            trace[4],
            TraceEntry::Conflict {
                conflict: SCORE_DISAGREEMENT.to_string()
            }
        );
        assert_eq!(
            trace.last(),
            Some(&TraceEntry::FinalDecision {
                final_decision: Verdict::Hire
            })
        );
    }

    #[test]
    fn test_skeptic_does_not_create_conflicts() {
        let outputs = vec![
            sample_result(AgentKind::Resume, 8.0),
            sample_result(AgentKind::Technical, 8.0),
            sample_result(AgentKind::Skeptic, 1.0),
        ];
        let report = build_final_report(&panel(outputs));
        assert_eq!(report.agent_interaction_trace.len(), 4);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = build_final_report(&panel(vec![]));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["candidateAssessment"]["averageScore"], json!(72.5));
        assert_eq!(value["candidateAssessment"]["verdict"], json!("Hire"));
        assert_eq!(value["agentInteractionTrace"], json!([{"finalDecision": "Hire"}]));
        assert_eq!(value["discrepancyLog"], json!([]));
    }
}
