//! ExecuteStep node: one plan step against the tool-aware model.
//!
//! The step instruction is sent with the transcript but never stored. A reply
//! with tool calls leaves the cursor in place; any other reply advances it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::prompts::execute_step_prompt;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;

use super::PlanState;

pub struct ExecuteStepNode {
    /// Tool-aware variant of the agent's model.
    llm: Arc<dyn LlmClient>,
}

impl ExecuteStepNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<PlanState> for ExecuteStepNode {
    fn id(&self) -> &str {
        "execute_step"
    }

    async fn run(&self, state: PlanState) -> Result<(PlanState, Next), AgentError> {
        let Some(objective) = state.plan.get(state.current_step) else {
            return Ok((state, Next::Continue));
        };
        tracing::debug!(
            step = state.current_step,
            total = state.plan.len(),
            "executing plan step"
        );
        let mut prompt = state.messages.clone();
        prompt.push(Message::user(execute_step_prompt(objective)));
        let response = self.llm.invoke(&prompt).await?;

        let mut state = state;
        if response.tool_calls.is_empty() {
            state.messages.push(Message::assistant(response.content));
            state.current_step += 1;
        } else {
            state
                .messages
                .push(Message::tool_request(response.content, response.tool_calls));
        }
        Ok((state, Next::Continue))
    }
}
