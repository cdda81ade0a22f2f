// Prompt templates for the evaluation panel.
// Agent placeholders are filled in one pass by `fill_template`; shared fragments
// come from llm_client::prompts.

use crate::evaluation::models::EvaluationRequest;
use crate::llm_client::prompts::{AGENT_RESPONSE_SCHEMA, EVIDENCE_INSTRUCTION, JSON_ONLY_SYSTEM};

/// Stand-in for an empty transcript so agents note the absence instead of guessing.
pub const NO_TRANSCRIPT_PLACEHOLDER: &str = "(No interview transcript was provided. \
    Say so where interview evidence would be needed; do not infer interview performance.)";

pub const RESUME_ROLE: &str = "You are the Resume Agent on a hiring panel. \
    You judge how well the candidate's documented experience and skills match the job description.";

pub const TECHNICAL_ROLE: &str = "You are the Technical Agent on a hiring panel. \
    You judge technical depth: problem solving, system design, and the accuracy of technical answers.";

pub const BEHAVIORAL_ROLE: &str = "You are the Behavioral Agent on a hiring panel. \
    You judge collaboration, ownership, and communication using STAR-structured evidence.";

pub const CLAIM_ROLE: &str = "You are the Claim Agent on a hiring panel. \
    You cross-check resume claims against what the candidate said in the interview.";

pub const SKEPTIC_ROLE: &str = "You are the Skeptic Agent on a hiring panel. \
    You argue the strongest reasonable case against hiring and look for red flags others might miss.";

pub const CONSENSUS_ROLE: &str = "You are the Consensus Agent for a hiring panel. \
    You synthesise independent evaluations into one balanced summary.";

/// Shared body for the scoring agents. Fill `{focus}` and `{extra}` per agent.
pub const AGENT_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate for the role below.

FOCUS:
{focus}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume}

INTERVIEW TRANSCRIPT:
{transcript}
{extra}
{evidence_instruction}

Score on a 0-100 scale. Return a JSON object with this EXACT schema:
{schema}"#;

pub const RESUME_FOCUS: &str = "Required skills coverage, relevance and recency of experience, \
    seniority fit, and missing qualifications (list them under \"gaps\").";

pub const TECHNICAL_FOCUS: &str = "Depth and correctness of technical reasoning shown in the \
    interview, backed by the resume. Without a transcript, score on resume evidence only and \
    list the missing interview evidence under \"concerns\".";

pub const BEHAVIORAL_FOCUS: &str = "Situation, Task, Action, Result structure in the candidate's \
    answers; ownership, teamwork, and handling of conflict. Without a transcript, list the missing \
    behavioral evidence under \"concerns\".";

pub const CLAIM_FOCUS: &str = "Every quantified or leadership claim in the resume and whether the \
    interview confirms, contradicts, or never addresses it. List contradictions under \
    \"contradictions\" as 'resume says X, interview says Y'.";

pub const SKEPTIC_FOCUS: &str = "Inflated titles, unexplained gaps, vague impact, buzzword density, \
    and answers that avoid specifics. Be fair: do not invent problems.";

pub const CONSENSUS_PROMPT_TEMPLATE: &str = r#"The following evaluations were produced independently by panel agents:

{agent_outputs_json}

Summarise where they agree and disagree. Return a JSON object with this EXACT schema:
{
  "summary": "three or four sentences",
  "strengths": ["strength most agents agree on"],
  "concerns": ["concern most agents agree on"]
}"#;

pub fn system_prompt(role: &str) -> String {
    format!("{role}\n\n{JSON_ONLY_SYSTEM}")
}

/// Fills the shared agent template for one request.
pub fn agent_prompt(request: &EvaluationRequest, focus: &str, extra: &str) -> String {
    let transcript = if request.has_transcript() {
        request.transcript.as_str()
    } else {
        NO_TRANSCRIPT_PLACEHOLDER
    };

    fill_template(
        AGENT_PROMPT_TEMPLATE,
        &[
            ("focus", focus),
            ("extra", extra),
            ("evidence_instruction", EVIDENCE_INSTRUCTION),
            ("schema", AGENT_RESPONSE_SCHEMA),
            ("job_description", request.job_description.trim()),
            ("resume", request.resume.trim()),
            ("transcript", transcript.trim()),
        ],
    )
}

/// Replaces `{name}` placeholders in a single pass over `template`.
/// Substituted text is never rescanned, so candidate text that happens to
/// contain `{resume}` or `{transcript}` is sent as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find_map(|(name, value)| {
            tail.strip_prefix(name)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_prompt_substitutes_all_placeholders() {
        let request = EvaluationRequest::new("RESUME_TEXT", "TRANSCRIPT_TEXT", "JD_TEXT");
        let prompt = agent_prompt(&request, RESUME_FOCUS, "EXTRA");
        for needle in ["RESUME_TEXT", "TRANSCRIPT_TEXT", "JD_TEXT", "EXTRA", "\"score\""] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_candidate_text_with_placeholder_syntax_is_not_expanded() {
        let request = EvaluationRequest::new(
            "Wrote docs for {transcript} templating",
            "Asked about {resume} fields",
            "Needs {resume} parsing skills",
        );
        let prompt = agent_prompt(&request, RESUME_FOCUS, "Note: {job_description}");
        assert!(prompt.contains("Needs {resume} parsing skills"));
        assert!(prompt.contains("Wrote docs for {transcript} templating"));
        assert!(prompt.contains("Asked about {resume} fields"));
        assert!(prompt.contains("Note: {job_description}"));
        assert_eq!(prompt.matches("Asked about").count(), 1);
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template("{\"a\": {x}, {y}}", &[("x", "1")]);
        assert_eq!(filled, "{\"a\": 1, {y}}");
    }

    #[test]
    fn test_agent_prompt_marks_missing_transcript() {
        let request = EvaluationRequest::new("resume", "  ", "jd");
        let prompt = agent_prompt(&request, TECHNICAL_FOCUS, "");
        assert!(prompt.contains(NO_TRANSCRIPT_PLACEHOLDER));
    }

    #[test]
    fn test_system_prompt_carries_role_and_json_rule() {
        let system = system_prompt(SKEPTIC_ROLE);
        assert!(system.starts_with("You are the Skeptic Agent"));
        assert!(system.contains("valid JSON only"));
    }
}
