//! Resume Agent: skills and experience fit against the job description.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::evaluation::agents::prompts::{agent_prompt, system_prompt, RESUME_FOCUS, RESUME_ROLE};
use crate::evaluation::agents::Evaluator;
use crate::evaluation::matching::{
    calculate_skill_match, extract_skill_terms, terms_mentioned_in, SkillMatch,
};
use crate::evaluation::models::{AgentKind, AgentResult, EvaluationRequest};

pub struct ResumeAgent<'a> {
    request: &'a EvaluationRequest,
    pre_screen: SkillMatch,
}

impl<'a> ResumeAgent<'a> {
    /// Runs the keyword pre-screen up front; it is fed to the prompt and backs `gaps`.
    pub fn new(request: &'a EvaluationRequest) -> Self {
        let required = extract_skill_terms(&request.job_description);
        let present = terms_mentioned_in(&request.resume, &required);
        let no_priority: [&str; 0] = [];
        let pre_screen = calculate_skill_match(&present, &required, &no_priority);
        Self {
            request,
            pre_screen,
        }
    }
}

#[async_trait]
impl Evaluator for ResumeAgent<'_> {
    fn kind(&self) -> AgentKind {
        AgentKind::Resume
    }

    fn system_prompt(&self) -> String {
        system_prompt(RESUME_ROLE)
    }

    fn user_prompt(&self) -> String {
        let extra = format!(
            "\nKEYWORD PRE-SCREEN (exact term match, treat as a hint only):\n\
             alignment: {}%\nmatched: {}\nmissing: {}\n",
            self.pre_screen.alignment_percent,
            self.pre_screen.matched.join(", "),
            self.pre_screen.missing.join(", ")
        );
        agent_prompt(self.request, RESUME_FOCUS, &extra)
    }

    /// Gaps are always populated: keyword misses stand in when the model lists none.
    fn finalize(&self, mut result: AgentResult, _raw: &Map<String, Value>) -> AgentResult {
        if result.gaps.is_empty() {
            result.gaps = self
                .pre_screen
                .missing
                .iter()
                .map(|skill| format!("No evidence of {skill} in resume"))
                .collect();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::agents::testing::{agent_reply, MockLlm};
    use serde_json::json;

    fn request() -> EvaluationRequest {
        EvaluationRequest::new(
            "5 years Node.js, AWS",
            "",
            "Backend engineer, Node.js, AWS, Kubernetes",
        )
    }

    #[test]
    fn test_pre_screen_matches_job_terms() {
        let request = request();
        let agent = ResumeAgent::new(&request);
        assert_eq!(agent.pre_screen.alignment_percent, 50);
        assert_eq!(
            agent.pre_screen.missing,
            vec!["Backend engineer".to_string(), "Kubernetes".to_string()]
        );
        assert!(agent.user_prompt().contains("alignment: 50%"));
    }

    #[tokio::test]
    async fn test_gaps_fall_back_to_pre_screen_misses() {
        let request = request();
        let llm = MockLlm::new().reply(AgentKind::Resume, agent_reply(72.0, "Hire"));
        let result = ResumeAgent::new(&request).evaluate(&llm).await.unwrap();
        assert_eq!(result.score, 7.2);
        assert!(result.gaps.contains(&"No evidence of Kubernetes in resume".to_string()));
    }

    #[tokio::test]
    async fn test_model_gaps_are_kept() {
        let request = request();
        let reply = json!({"score": 60, "recommendation": "No Hire", "gaps": ["No Kubernetes"]});
        let llm = MockLlm::new().reply(AgentKind::Resume, reply.to_string());
        let result = ResumeAgent::new(&request).evaluate(&llm).await.unwrap();
        assert_eq!(result.gaps, vec!["No Kubernetes".to_string()]);
    }
}
