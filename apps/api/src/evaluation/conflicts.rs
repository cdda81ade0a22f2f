//! Conflict detection over a set of agent results.

use std::collections::HashSet;

use crate::evaluation::models::AgentResult;

pub const SCORE_DISAGREEMENT: &str = "Large scoring disagreement detected";
pub const VERDICT_DISAGREEMENT: &str = "Agents disagree on final verdict";

/// Canonical-scale spread above which scores count as a disagreement.
pub const MAX_SCORE_SPREAD: f64 = 3.0;

/// Flags a score spread wider than `MAX_SCORE_SPREAD`, then a split between
/// recommendation labels. Fewer than two results never conflict.
pub fn detect_conflicts<'a>(results: impl IntoIterator<Item = &'a AgentResult>) -> Vec<String> {
    let results: Vec<&AgentResult> = results.into_iter().collect();
    let mut conflicts = Vec::new();
    if results.len() < 2 {
        return conflicts;
    }

    let (min, max) = results
        .iter()
        .map(|r| r.score)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s), hi.max(s))
        });
    if max - min > MAX_SCORE_SPREAD {
        conflicts.push(SCORE_DISAGREEMENT.to_string());
    }

    let labels: HashSet<_> = results.iter().map(|r| r.recommendation).collect();
    if labels.len() > 1 {
        conflicts.push(VERDICT_DISAGREEMENT.to_string());
    }

    conflicts
}

/// The results that take part in conflict detection: voting roles that
/// produced a score. Narrative-only and unscored results are left out.
pub fn voting_results(outputs: &[AgentResult]) -> impl Iterator<Item = &AgentResult> {
    outputs
        .iter()
        .filter(|r| r.kind.scoring_role().is_some() && r.score > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::agents::testing::sample_result;
    use crate::evaluation::models::{AgentKind, Recommendation};

    fn result(kind: AgentKind, score: f64, recommendation: Recommendation) -> AgentResult {
        AgentResult {
            recommendation,
            ..sample_result(kind, score)
        }
    }

    #[test]
    fn test_wide_spread_and_split_verdicts() {
        let results = vec![
            result(AgentKind::Resume, 9.0, Recommendation::StrongHire),
            result(AgentKind::Technical, 9.0, Recommendation::StrongHire),
            result(AgentKind::Behavioral, 9.0, Recommendation::StrongHire),
            result(AgentKind::Claim, 5.0, Recommendation::NoHire),
        ];
        assert_eq!(
            detect_conflicts(&results),
            vec![SCORE_DISAGREEMENT.to_string(), VERDICT_DISAGREEMENT.to_string()]
        );
    }

    #[test]
    fn test_wide_spread_with_agreeing_labels_flags_scores_only() {
        let results = vec![
            result(AgentKind::Resume, 9.0, Recommendation::Hire),
            result(AgentKind::Technical, 9.0, Recommendation::Hire),
            result(AgentKind::Behavioral, 9.0, Recommendation::Hire),
            result(AgentKind::Claim, 5.0, Recommendation::Hire),
        ];
        assert_eq!(detect_conflicts(&results), vec![SCORE_DISAGREEMENT.to_string()]);
    }

    #[test]
    fn test_spread_of_exactly_three_is_not_a_conflict() {
        let results = vec![
            result(AgentKind::Resume, 8.0, Recommendation::Hire),
            result(AgentKind::Technical, 5.0, Recommendation::Hire),
        ];
        assert!(detect_conflicts(&results).is_empty());
    }

    #[test]
    fn test_label_split_alone() {
        let results = vec![
            result(AgentKind::Resume, 7.0, Recommendation::Hire),
            result(AgentKind::Technical, 6.0, Recommendation::NoHire),
        ];
        assert_eq!(detect_conflicts(&results), vec![VERDICT_DISAGREEMENT.to_string()]);
    }

    #[test]
    fn test_single_or_empty_input_has_no_conflicts() {
        assert!(detect_conflicts(&Vec::<AgentResult>::new()).is_empty());
        let one = vec![result(AgentKind::Resume, 2.0, Recommendation::StrongNoHire)];
        assert!(detect_conflicts(&one).is_empty());
    }

    #[test]
    fn test_voting_results_skip_skeptic_and_unscored() {
        let outputs = vec![
            result(AgentKind::Resume, 8.0, Recommendation::Hire),
            result(AgentKind::Claim, 0.0, Recommendation::NoHire),
            result(AgentKind::Skeptic, 1.0, Recommendation::StrongNoHire),
        ];
        let kinds: Vec<AgentKind> = voting_results(&outputs).map(|r| r.kind).collect();
        assert_eq!(kinds, vec![AgentKind::Resume]);
        assert!(detect_conflicts(voting_results(&outputs)).is_empty());
    }
}
