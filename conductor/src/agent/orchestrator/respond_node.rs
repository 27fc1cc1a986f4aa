//! Respond node: the orchestrator answers directly.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::prompts::ORCHESTRATOR_SYSTEM_PROMPT;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;

use super::OrchestratorState;

pub struct RespondNode {
    llm: Arc<dyn LlmClient>,
}

impl RespondNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<OrchestratorState> for RespondNode {
    fn id(&self) -> &str {
        "respond"
    }

    async fn run(
        &self,
        state: OrchestratorState,
    ) -> Result<(OrchestratorState, Next), AgentError> {
        let mut prompt = Vec::with_capacity(state.messages.len() + 1);
        prompt.push(Message::system(ORCHESTRATOR_SYSTEM_PROMPT));
        prompt.extend(state.messages.iter().cloned());
        let response = self.llm.invoke(&prompt).await?;
        let mut state = state;
        state.messages.push(Message::assistant(response.content));
        Ok((state, Next::Continue))
    }
}
