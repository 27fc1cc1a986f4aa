//! CreatePlan node: structured plan from the model, summary message, cursor reset.

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::prompts::PLANNER_SYSTEM_PROMPT;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{structured, LlmClient, Plan};
use crate::message::Message;

use super::PlanState;

pub struct CreatePlanNode {
    llm: Arc<dyn LlmClient>,
    max_steps: usize,
}

impl CreatePlanNode {
    pub fn new(llm: Arc<dyn LlmClient>, max_steps: usize) -> Self {
        Self { llm, max_steps }
    }
}

/// `Here is my plan:` followed by one `- step` line per step.
pub(super) fn plan_message(steps: &[String]) -> String {
    let lines: Vec<String> = steps.iter().map(|s| format!("- {}", s)).collect();
    format!("Here is my plan:\n{}", lines.join("\n"))
}

#[async_trait]
impl Node<PlanState> for CreatePlanNode {
    fn id(&self) -> &str {
        "create_plan"
    }

    async fn run(&self, state: PlanState) -> Result<(PlanState, Next), AgentError> {
        let mut prompt = Vec::with_capacity(state.messages.len() + 1);
        prompt.push(Message::system(PLANNER_SYSTEM_PROMPT));
        prompt.extend(state.messages.iter().cloned());
        let plan: Plan = structured(self.llm.as_ref(), &prompt).await?;

        let mut steps: Vec<String> = plan
            .steps
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if steps.len() > self.max_steps {
            tracing::warn!(
                steps = steps.len(),
                max = self.max_steps,
                "plan truncated"
            );
            steps.truncate(self.max_steps);
        }
        tracing::debug!(steps = steps.len(), "plan created");

        let mut messages = state.messages;
        messages.push(Message::assistant(plan_message(&steps)));
        Ok((
            PlanState {
                messages,
                plan: steps,
                current_step: 0,
            },
            Next::Continue,
        ))
    }
}
