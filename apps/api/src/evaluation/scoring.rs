//! Score Normalizer: pure conversions between score scales and recommendation labels.
//!
//! Canonical scale is 0–10 (one decimal). Reporting scale is 0–100.
//! None of these functions fail; bad input yields 0.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::evaluation::models::Recommendation;

/// Ladder cut points for `score_to_recommendation`, on the canonical scale.
pub const STRONG_HIRE_CUTOFF: f64 = 8.0;
pub const HIRE_CUTOFF: f64 = 6.5;
pub const NO_HIRE_CUTOFF: f64 = 4.0;

pub const CANONICAL_MAX: f64 = 10.0;
pub const PERCENT_MAX: f64 = 100.0;

/// Linearly rescales `raw` from `[min, max]` onto 0–10, clamps, and rounds to one decimal.
/// NaN, infinities, and an empty range yield 0.
pub fn normalize_score(raw: f64, min: f64, max: f64) -> f64 {
    if !raw.is_finite() || !min.is_finite() || !max.is_finite() || max <= min {
        return 0.0;
    }
    let scaled = (raw - min) / (max - min) * CANONICAL_MAX;
    round1(scaled.clamp(0.0, CANONICAL_MAX))
}

/// Reads a number out of a JSON number or a numeric string.
pub fn coerce_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Fixed threshold ladder: ≥8.0 Strong Hire, ≥6.5 Hire, ≥4.0 No Hire, else Strong No Hire.
pub fn score_to_recommendation(score: f64) -> Recommendation {
    if score >= STRONG_HIRE_CUTOFF {
        Recommendation::StrongHire
    } else if score >= HIRE_CUTOFF {
        Recommendation::Hire
    } else if score >= NO_HIRE_CUTOFF {
        Recommendation::NoHire
    } else {
        Recommendation::StrongNoHire
    }
}

/// Threshold policy: the ladder applied to a role-weighted canonical score.
/// Reported alongside, never instead of, the panel's majority vote.
pub fn recommendation_by_threshold(weighted_score: f64) -> Recommendation {
    score_to_recommendation(weighted_score)
}

/// Weighted mean over keys present in both maps with a finite score and a
/// positive finite weight. Missing entries drop out of the denominator.
/// Returns 0 when nothing qualifies.
pub fn calculate_weighted_score<K: Ord>(
    scores: &BTreeMap<K, f64>,
    weights: &BTreeMap<K, f64>,
) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (key, score) in scores {
        let Some(weight) = weights.get(key) else {
            continue;
        };
        if !score.is_finite() || !weight.is_finite() || *weight <= 0.0 {
            continue;
        }
        weighted_sum += score * weight;
        weight_total += weight;
    }

    if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    }
}

/// Dual-scale interpretation of a model-supplied score as a percentage:
/// values ≤ 1 are read as fractions and multiplied by 100, larger values are
/// taken as already on 0–100. A raw `1` therefore always means 100%, never 1%.
pub fn percent_from_raw(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let percent = if raw <= 1.0 { raw * 100.0 } else { raw };
    round1(percent.clamp(0.0, PERCENT_MAX))
}

/// Canonical 0–10 score to the 0–100 reporting scale.
pub fn canonical_to_percent(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    round1((score * 10.0).clamp(0.0, PERCENT_MAX))
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_score_bounds() {
        assert_eq!(normalize_score(f64::NAN, 0.0, 10.0), 0.0);
        assert_eq!(normalize_score(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize_score(15.0, 0.0, 10.0), 10.0);
        assert_eq!(normalize_score(f64::INFINITY, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_normalize_score_rescales_and_rounds() {
        assert_eq!(normalize_score(85.0, 0.0, 100.0), 8.5);
        assert_eq!(normalize_score(0.73, 0.0, 1.0), 7.3);
        assert_eq!(normalize_score(6.66, 0.0, 10.0), 6.7);
    }

    #[test]
    fn test_normalize_score_stays_in_range_for_many_inputs() {
        for raw in [-1e9, -0.5, 0.0, 0.1, 3.3, 9.99, 10.0, 10.01, 1e9] {
            let s = normalize_score(raw, 0.0, 10.0);
            assert!((0.0..=10.0).contains(&s), "{raw} normalized to {s}");
        }
    }

    #[test]
    fn test_normalize_score_degenerate_range_is_zero() {
        assert_eq!(normalize_score(5.0, 10.0, 10.0), 0.0);
        assert_eq!(normalize_score(5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_coerce_number_handles_loose_json() {
        assert_eq!(coerce_number(&json!(7.5)), Some(7.5));
        assert_eq!(coerce_number(&json!(" 80% ")), Some(80.0));
        assert_eq!(coerce_number(&json!("high")), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn test_score_to_recommendation_cut_points() {
        assert_eq!(score_to_recommendation(8.0), Recommendation::StrongHire);
        assert_eq!(score_to_recommendation(7.9), Recommendation::Hire);
        assert_eq!(score_to_recommendation(6.5), Recommendation::Hire);
        assert_eq!(score_to_recommendation(6.4), Recommendation::NoHire);
        assert_eq!(score_to_recommendation(4.0), Recommendation::NoHire);
        assert_eq!(score_to_recommendation(3.9), Recommendation::StrongNoHire);
        assert_eq!(score_to_recommendation(0.0), Recommendation::StrongNoHire);
        assert_eq!(score_to_recommendation(10.0), Recommendation::StrongHire);
    }

    #[test]
    fn test_weighted_score_renormalizes_missing_weights() {
        let scores = BTreeMap::from([("a", 8.0), ("b", 4.0), ("c", 10.0)]);
        let weights = BTreeMap::from([("a", 3.0), ("b", 1.0)]);
        // c has no weight: (8*3 + 4*1) / 4 = 7
        assert!((calculate_weighted_score(&scores, &weights) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_score_skips_invalid_entries() {
        let scores = BTreeMap::from([("a", f64::NAN), ("b", 6.0), ("c", 9.0)]);
        let weights = BTreeMap::from([("a", 1.0), ("b", 1.0), ("c", -2.0)]);
        assert!((calculate_weighted_score(&scores, &weights) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_score_empty_is_zero() {
        let scores: BTreeMap<&str, f64> = BTreeMap::new();
        let weights = BTreeMap::from([("a", 1.0)]);
        assert_eq!(calculate_weighted_score(&scores, &weights), 0.0);
    }

    #[test]
    fn test_percent_from_raw_dual_scale() {
        assert_eq!(percent_from_raw(0.8), 80.0);
        assert_eq!(percent_from_raw(1.0), 100.0);
        assert_eq!(percent_from_raw(72.0), 72.0);
        assert_eq!(percent_from_raw(140.0), 100.0);
        assert_eq!(percent_from_raw(-3.0), 0.0);
        assert_eq!(percent_from_raw(f64::NAN), 0.0);
    }

    #[test]
    fn test_canonical_to_percent() {
        assert_eq!(canonical_to_percent(8.0), 80.0);
        assert_eq!(canonical_to_percent(6.5), 65.0);
        assert_eq!(canonical_to_percent(12.0), 100.0);
    }
}
