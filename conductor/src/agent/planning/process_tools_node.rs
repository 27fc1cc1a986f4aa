//! ProcessTools node: plain model reads the tool results, the step is done.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;

use super::PlanState;

pub struct ProcessToolsNode {
    llm: Arc<dyn LlmClient>,
}

impl ProcessToolsNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Node<PlanState> for ProcessToolsNode {
    fn id(&self) -> &str {
        "process_tools"
    }

    async fn run(&self, state: PlanState) -> Result<(PlanState, Next), AgentError> {
        let response = self.llm.invoke(&state.messages).await?;
        let mut state = state;
        state.messages.push(Message::assistant(response.content));
        state.current_step = (state.current_step + 1).min(state.plan.len());
        Ok((state, Next::Continue))
    }
}
