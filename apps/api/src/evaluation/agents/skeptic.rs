//! Skeptic Agent: adversarial review. Narrative only: its score never enters the vote.

use async_trait::async_trait;

use crate::evaluation::agents::prompts::{agent_prompt, system_prompt, SKEPTIC_FOCUS, SKEPTIC_ROLE};
use crate::evaluation::agents::Evaluator;
use crate::evaluation::models::{AgentKind, EvaluationRequest};

pub struct SkepticAgent<'a> {
    request: &'a EvaluationRequest,
}

impl<'a> SkepticAgent<'a> {
    pub fn new(request: &'a EvaluationRequest) -> Self {
        Self { request }
    }
}

#[async_trait]
impl Evaluator for SkepticAgent<'_> {
    fn kind(&self) -> AgentKind {
        AgentKind::Skeptic
    }

    fn system_prompt(&self) -> String {
        system_prompt(SKEPTIC_ROLE)
    }

    fn user_prompt(&self) -> String {
        agent_prompt(self.request, SKEPTIC_FOCUS, "")
    }
}
