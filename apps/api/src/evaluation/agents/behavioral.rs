//! Behavioral Agent: STAR-style evidence of ownership and collaboration.

use async_trait::async_trait;

use crate::evaluation::agents::prompts::{
    agent_prompt, system_prompt, BEHAVIORAL_FOCUS, BEHAVIORAL_ROLE,
};
use crate::evaluation::agents::Evaluator;
use crate::evaluation::models::{AgentKind, EvaluationRequest};

pub struct BehavioralAgent<'a> {
    request: &'a EvaluationRequest,
}

impl<'a> BehavioralAgent<'a> {
    pub fn new(request: &'a EvaluationRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl Evaluator for BehavioralAgent<'_> {
    fn kind(&self) -> AgentKind {
        AgentKind::Behavioral
    }

    fn system_prompt(&self) -> String {
        system_prompt(BEHAVIORAL_ROLE)
    }

    fn user_prompt(&self) -> String {
        agent_prompt(self.request, BEHAVIORAL_FOCUS, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::agents::prompts::NO_TRANSCRIPT_PLACEHOLDER;
    use crate::evaluation::agents::testing::{agent_reply, MockLlm};
    use crate::evaluation::models::Recommendation;

    #[tokio::test]
    async fn test_empty_transcript_still_evaluates() {
        let request = EvaluationRequest::new("resume", "", "jd");
        let agent = BehavioralAgent::new(&request);
        assert!(agent.user_prompt().contains(NO_TRANSCRIPT_PLACEHOLDER));

        let llm = MockLlm::new().reply(AgentKind::Behavioral, agent_reply(0.45, "No Hire"));
        let result = agent.evaluate(&llm).await.unwrap();
        assert_eq!(result.score, 4.5);
        assert_eq!(result.recommendation, Recommendation::NoHire);
    }
}
