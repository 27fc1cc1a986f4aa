//! Analyze node: structured routing decision over the managed agents.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::prompts::analyze_prompt;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{structured, LlmClient, RouteDecision};
use crate::message::Message;

use super::OrchestratorState;

pub struct AnalyzeNode {
    llm: Arc<dyn LlmClient>,
    /// (name, description) of every managed agent, in construction order.
    agents: Vec<(String, String)>,
}

impl AnalyzeNode {
    pub fn new(llm: Arc<dyn LlmClient>, agents: Vec<(String, String)>) -> Self {
        Self { llm, agents }
    }
}

#[async_trait]
impl Node<OrchestratorState> for AnalyzeNode {
    fn id(&self) -> &str {
        "analyze"
    }

    async fn run(
        &self,
        state: OrchestratorState,
    ) -> Result<(OrchestratorState, Next), AgentError> {
        let mut prompt = Vec::with_capacity(state.messages.len() + 1);
        prompt.push(Message::system(analyze_prompt(&self.agents)));
        prompt.extend(state.messages.iter().cloned());
        let decision: RouteDecision = structured(self.llm.as_ref(), &prompt).await?;
        let chosen = decision.chosen_agent.trim().to_string();
        tracing::debug!(chosen_agent = %chosen, reason = %decision.reason, "routing decision");

        let mut state = state;
        state.active_agent = chosen;
        state.specialized_agents = self.agents.iter().map(|(n, _)| n.clone()).collect();
        Ok((state, Next::Continue))
    }
}
