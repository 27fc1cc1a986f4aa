//! Respond node: final answer to the original request.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::prompts::PLANNER_RESPOND_PROMPT;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;

use super::PlanState;

pub struct RespondNode {
    llm: Arc<dyn LlmClient>,
}

impl RespondNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<PlanState> for RespondNode {
    fn id(&self) -> &str {
        "respond"
    }

    async fn run(&self, state: PlanState) -> Result<(PlanState, Next), AgentError> {
        let mut prompt = state.messages.clone();
        prompt.push(Message::user(PLANNER_RESPOND_PROMPT));
        let response = self.llm.invoke(&prompt).await?;
        let mut state = state;
        state.messages.push(Message::assistant(response.content));
        Ok((state, Next::End))
    }
}
