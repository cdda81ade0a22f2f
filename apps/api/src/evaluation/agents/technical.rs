//! Technical Agent: depth of technical reasoning.

use async_trait::async_trait;

use crate::evaluation::agents::prompts::{
    agent_prompt, system_prompt, TECHNICAL_FOCUS, TECHNICAL_ROLE,
};
use crate::evaluation::agents::Evaluator;
use crate::evaluation::models::{AgentKind, EvaluationRequest};

pub struct TechnicalAgent<'a> {
    request: &'a EvaluationRequest,
}

impl<'a> TechnicalAgent<'a> {
    pub fn new(request: &'a EvaluationRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl Evaluator for TechnicalAgent<'_> {
    fn kind(&self) -> AgentKind {
        AgentKind::Technical
    }

    fn system_prompt(&self) -> String {
        system_prompt(TECHNICAL_ROLE)
    }

    fn user_prompt(&self) -> String {
        agent_prompt(self.request, TECHNICAL_FOCUS, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::agents::testing::MockLlm;
    use crate::evaluation::agents::AgentError;

    #[tokio::test]
    async fn test_unparseable_reply_is_an_error() {
        let request = EvaluationRequest::new("resume", "transcript", "jd");
        let llm = MockLlm::new().reply(AgentKind::Technical, "Looks strong to me.");
        let err = TechnicalAgent::new(&request).evaluate(&llm).await.unwrap_err();
        assert!(matches!(err, AgentError::Unparseable(_)));
    }

    #[tokio::test]
    async fn test_llm_failure_is_an_error() {
        let request = EvaluationRequest::new("resume", "transcript", "jd");
        let llm = MockLlm::new().fail(AgentKind::Technical);
        let err = TechnicalAgent::new(&request).evaluate(&llm).await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }
}
