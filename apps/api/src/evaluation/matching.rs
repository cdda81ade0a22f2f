//! Skill/Claim Matcher: deterministic text heuristics that run alongside the LLM evaluators.
//!
//! Nothing here is a final judgment. Skill matching is exact-string, contradiction
//! detection is recall-oriented, and consensus clustering is greedy and order-sensitive:
//! feeding the same findings in a different agent order can produce different clusters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::evaluation::models::AgentResult;

/// Priority skills count this much toward numerator and denominator.
pub const PRIORITY_SKILL_WEIGHT: f64 = 1.5;

/// Words and symbols that mark a statement as a checkable claim.
pub const CLAIM_INDICATORS: &[&str] = &[
    "led",
    "managed",
    "team of",
    "%",
    "percent",
    "years",
    "built",
    "increased",
    "reduced",
    "grew",
    "saved",
    "launched",
    "owned",
    "architected",
    "scaled",
    "delivered",
];

/// Items sharing this many significant words are clustered together.
const CONSENSUS_SHARED_WORDS: usize = 3;
/// Words must be longer than this to count as significant.
const SIGNIFICANT_WORD_MIN_LEN: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Skill matching
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub alignment_percent: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Weighted share of `required_skills` present in `candidate_skills`.
///
/// Matching is case-insensitive on trimmed strings. Skills listed in
/// `priority_skills` weigh `PRIORITY_SKILL_WEIGHT`. No required skills means 100%.
pub fn calculate_skill_match<C, R, P>(
    candidate_skills: &[C],
    required_skills: &[R],
    priority_skills: &[P],
) -> SkillMatch
where
    C: AsRef<str>,
    R: AsRef<str>,
    P: AsRef<str>,
{
    let candidate: HashSet<String> = candidate_skills
        .iter()
        .map(|s| normalize_skill(s.as_ref()))
        .collect();
    let priority: HashSet<String> = priority_skills
        .iter()
        .map(|s| normalize_skill(s.as_ref()))
        .collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut matched_weight = 0.0_f64;
    let mut total_weight = 0.0_f64;

    for skill in required_skills {
        let display = skill.as_ref().trim();
        if display.is_empty() {
            continue;
        }
        let key = normalize_skill(display);
        let weight = if priority.contains(&key) {
            PRIORITY_SKILL_WEIGHT
        } else {
            1.0
        };
        total_weight += weight;

        if candidate.contains(&key) {
            matched_weight += weight;
            matched.push(display.to_string());
        } else {
            missing.push(display.to_string());
        }
    }

    let alignment_percent = if total_weight > 0.0 {
        ((matched_weight / total_weight) * 100.0).round() as u32
    } else {
        100
    };

    SkillMatch {
        alignment_percent,
        matched,
        missing,
    }
}

fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Pulls short skill-like terms out of a job description.
///
/// Splits on list separators, drops anything before a `label:` prefix, and keeps
/// segments of one to four words. Deduplicated case-insensitively, first spelling wins.
pub fn extract_skill_terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for segment in text.split(|c| matches!(c, ',' | ';' | '\n' | '|' | '•')) {
        let segment = segment.rsplit(':').next().unwrap_or(segment);
        let term = segment
            .trim()
            .trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace())
            .trim_end_matches(|c: char| c == '.' || c.is_whitespace());
        let word_count = term.split_whitespace().count();
        if term.is_empty() || word_count > 4 {
            continue;
        }
        if seen.insert(term.to_lowercase()) {
            terms.push(term.to_string());
        }
    }

    terms
}

/// The subset of `terms` mentioned in `text` as whole words.
pub fn terms_mentioned_in(text: &str, terms: &[String]) -> Vec<String> {
    let lower = text.to_lowercase();
    terms
        .iter()
        .filter(|t| contains_keyword(&lower, &t.to_lowercase()))
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Contradiction candidates
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContradictionCandidate {
    pub statement_a: String,
    pub statement_b: String,
    pub conflicting_keywords: Vec<String>,
}

/// Flags statement pairs that talk about the same kind of claim but quote different numbers.
///
/// A statement in `source_a` is considered when it contains a claim indicator. It is
/// paired with every statement in `source_b` sharing one of those indicators, and the
/// pair is flagged when both carry numbers and the number sequences differ in order or
/// value. Candidates are for deeper review, not ground truth.
pub fn find_contradictions<A, B>(source_a: &[A], source_b: &[B]) -> Vec<ContradictionCandidate>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut candidates = Vec::new();

    for statement_a in source_a {
        let statement_a = statement_a.as_ref();
        let lower_a = statement_a.to_lowercase();
        let indicators_a: Vec<&str> = CLAIM_INDICATORS
            .iter()
            .copied()
            .filter(|kw| contains_keyword(&lower_a, kw))
            .collect();
        if indicators_a.is_empty() {
            continue;
        }
        let numbers_a = extract_numbers(statement_a);
        if numbers_a.is_empty() {
            continue;
        }

        for statement_b in source_b {
            let statement_b = statement_b.as_ref();
            let lower_b = statement_b.to_lowercase();
            let shared: Vec<String> = indicators_a
                .iter()
                .filter(|kw| contains_keyword(&lower_b, kw))
                .map(|kw| kw.to_string())
                .collect();
            if shared.is_empty() {
                continue;
            }

            let numbers_b = extract_numbers(statement_b);
            if !numbers_b.is_empty() && numbers_a != numbers_b {
                candidates.push(ContradictionCandidate {
                    statement_a: statement_a.trim().to_string(),
                    statement_b: statement_b.trim().to_string(),
                    conflicting_keywords: shared,
                });
            }
        }
    }

    candidates
}

/// Splits free text into statements on line breaks and sentence punctuation.
/// A period only ends a statement when followed by whitespace, so `4.5` survives.
pub fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let ends = match c {
            '\n' | '!' | '?' | ';' => true,
            '.' => chars.peek().map_or(true, |next| next.is_whitespace()),
            _ => false,
        };
        if ends {
            push_statement(&mut statements, &mut current);
        } else {
            current.push(c);
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    current.clear();
}

/// Decimal numbers in reading order. Thousands separators are folded in (`1,200` → 1200).
///
/// Recall over precision: a comma between digits is always a separator, so a
/// list written without spaces (`50,10`) reads as 5010. A run with more than one
/// dot (`1.2.3`) fails to parse and is dropped.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut numbers = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let mut raw = String::new();
        while i < chars.len() {
            let c = chars[i];
            let joins_digits = (c == '.' || c == ',')
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_digit() || (c == '.' && joins_digits) {
                raw.push(c);
            } else if c == ',' && joins_digits {
                // thousands separator
            } else {
                break;
            }
            i += 1;
        }
        if let Ok(n) = raw.parse::<f64>() {
            numbers.push(n);
        }
    }

    numbers
}

/// Whole-word search for alphabetic keywords, plain substring search otherwise.
fn contains_keyword(haystack_lower: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    if !keyword.chars().any(|c| c.is_alphanumeric()) {
        return haystack_lower.contains(keyword);
    }

    haystack_lower.match_indices(keyword).any(|(start, _)| {
        let before = haystack_lower[..start].chars().next_back();
        let after = haystack_lower[start + keyword.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Consensus clustering
// ────────────────────────────────────────────────────────────────────────────

/// Which list on `AgentResult` to cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingField {
    Strengths,
    Concerns,
}

impl FindingField {
    fn items(self, result: &AgentResult) -> &[String] {
        match self {
            FindingField::Strengths => &result.strengths,
            FindingField::Concerns => &result.concerns,
        }
    }
}

struct Cluster {
    representative: String,
    words: HashSet<String>,
    lower: String,
    agents: Vec<usize>,
}

/// Findings raised independently by at least `min_count` agents.
///
/// Single greedy pass: each item joins the first existing cluster whose first item
/// overlaps it (three shared significant words, or substring either way) and that
/// does not already hold an item from the same agent; otherwise it opens a new
/// cluster. Results are cluster representatives in creation order.
pub fn find_consensus_items(
    agent_results: &[AgentResult],
    field: FindingField,
    min_count: usize,
) -> Vec<String> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for (agent_idx, result) in agent_results.iter().enumerate() {
        for item in field.items(result) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let lower = item.to_lowercase();
            let words = significant_words(&lower);

            let existing = clusters.iter_mut().find(|c| {
                !c.agents.contains(&agent_idx) && items_overlap(&lower, &words, &c.lower, &c.words)
            });

            match existing {
                Some(cluster) => cluster.agents.push(agent_idx),
                None => clusters.push(Cluster {
                    representative: item.to_string(),
                    words,
                    lower,
                    agents: vec![agent_idx],
                }),
            }
        }
    }

    clusters
        .into_iter()
        .filter(|c| c.agents.len() >= min_count)
        .map(|c| c.representative)
        .collect()
}

fn significant_words(lower: &str) -> HashSet<String> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > SIGNIFICANT_WORD_MIN_LEN)
        .map(str::to_string)
        .collect()
}

fn items_overlap(
    a_lower: &str,
    a_words: &HashSet<String>,
    b_lower: &str,
    b_words: &HashSet<String>,
) -> bool {
    a_words.intersection(b_words).count() >= CONSENSUS_SHARED_WORDS
        || a_lower.contains(b_lower)
        || b_lower.contains(a_lower)
}
