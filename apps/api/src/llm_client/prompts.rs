// Shared prompt fragments.
// Each evaluator defines its own templates in evaluation::agents::prompts;
// this file holds the cross-cutting pieces they all append.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every evaluator prompt.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Base every finding on the resume, transcript, or job description text provided. \
    Do NOT invent experience, employers, or metrics. \
    If the material does not support a finding, omit it.";

/// Output schema shared by all scoring evaluators.
pub const AGENT_RESPONSE_SCHEMA: &str = r#"{
  "score": 0-100,
  "strengths": ["short finding"],
  "concerns": ["short finding"],
  "gaps": ["short finding"],
  "contradictions": ["short finding"],
  "recommendation": "Strong Hire" | "Hire" | "No Hire" | "Strong No Hire",
  "reasoning": "two or three sentences"
}"#;
