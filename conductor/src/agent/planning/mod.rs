//! Planning agent: plan, execute each step (with at most one tool round), answer.
//!
//! ```text
//! START → create_plan → execute_step ─┬→ tools → process_tools ─┬→ execute_step
//!                           ↑  │      │                         └→ respond → END
//!                           └──┘      └→ respond → END
//! ```
//!
//! `current_step` is the cursor into `plan`: it stays put while a step's tool
//! calls are executed and advances by one when the step completes, so
//! `0 <= current_step <= plan.len()` holds at every checkpoint.

mod create_plan_node;
mod execute_step_node;
mod process_tools_node;
mod respond_node;
mod tools_node;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::graph::{StateGraph, END, START};
use crate::llm::bind_tools;
use crate::message::Message;
use crate::tool_source::{ToolSource, ToolSpec};

use super::registry::AgentArgs;
use super::{Agent, AgentCore, AgentInput, AgentOutput, AgentState};

pub use create_plan_node::CreatePlanNode;
pub use execute_step_node::ExecuteStepNode;
pub use process_tools_node::ProcessToolsNode;
pub use respond_node::RespondNode;
pub use tools_node::ToolsNode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanState {
    pub messages: Vec<Message>,
    /// Step descriptions of the current planning cycle.
    pub plan: Vec<String>,
    /// Index of the step being executed.
    pub current_step: usize,
}

impl AgentState for PlanState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }
}

fn pending_tool_calls(state: &PlanState) -> bool {
    matches!(
        state.messages.last(),
        Some(Message::ToolRequest { tool_calls, .. }) if !tool_calls.is_empty()
    )
}

/// After `execute_step`: pending tool calls → `tools`; plan exhausted → `respond`; else loop.
pub fn route_from_execute_step(state: &PlanState) -> String {
    if pending_tool_calls(state) {
        "tools".to_string()
    } else if state.current_step >= state.plan.len() {
        "respond".to_string()
    } else {
        "execute_step".to_string()
    }
}

/// After `process_tools`: plan exhausted → `respond`; else next step.
pub fn route_from_process_tools(state: &PlanState) -> String {
    if state.current_step >= state.plan.len() {
        "respond".to_string()
    } else {
        "execute_step".to_string()
    }
}

fn path_map(targets: &[&str]) -> HashMap<String, String> {
    targets
        .iter()
        .map(|t| (t.to_string(), t.to_string()))
        .collect()
}

pub struct PlanningAgent {
    core: AgentCore<PlanState>,
}

impl PlanningAgent {
    pub const NAME: &'static str = "planning";
    pub const DESCRIPTION: &'static str =
        "Creates and executes comprehensive, step-by-step plans to solve complex tasks";

    /// Uses `args.tools` as both the offered tool set and the executor.
    pub fn new(args: AgentArgs) -> Result<Self, AgentError> {
        let specs = args.tools.list();
        let tools: Arc<dyn ToolSource> = Arc::new(args.tools.clone());
        Self::with_tool_source(args, tools, specs)
    }

    /// Offers `specs` to the model and executes requested calls through `tools`.
    pub fn with_tool_source(
        args: AgentArgs,
        tools: Arc<dyn ToolSource>,
        specs: Vec<ToolSpec>,
    ) -> Result<Self, AgentError> {
        let mut core = AgentCore::new(Self::NAME, Self::DESCRIPTION, args.thread_id, args.model)
            .with_recursion_limit(args.settings.recursion_limit);
        let model = core.model().clone();
        let model_with_tools = bind_tools(model.clone(), specs);

        let mut graph = StateGraph::<PlanState>::new();
        graph
            .add_node(
                "create_plan",
                Arc::new(CreatePlanNode::new(model.clone(), args.settings.max_plan_steps)),
            )
            .add_node("execute_step", Arc::new(ExecuteStepNode::new(model_with_tools)))
            .add_node("tools", Arc::new(ToolsNode::new(tools)))
            .add_node("process_tools", Arc::new(ProcessToolsNode::new(model.clone())))
            .add_node("respond", Arc::new(RespondNode::new(model)));
        graph
            .add_edge(START, "create_plan")
            .add_edge("create_plan", "execute_step")
            .add_edge("tools", "process_tools")
            .add_edge("respond", END);
        graph.add_conditional_edges(
            "execute_step",
            Arc::new(route_from_execute_step),
            Some(path_map(&["tools", "respond", "execute_step"])),
        );
        graph.add_conditional_edges(
            "process_tools",
            Arc::new(route_from_process_tools),
            Some(path_map(&["respond", "execute_step"])),
        );
        core.install(graph)?;

        Ok(Self { core })
    }

    /// Latest checkpointed state of this thread.
    pub async fn state(&self) -> Result<Option<PlanState>, AgentError> {
        self.core.latest_state().await
    }
}

#[async_trait]
impl Agent for PlanningAgent {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn description(&self) -> &str {
        self.core.description()
    }

    fn thread_id(&self) -> &str {
        self.core.thread_id()
    }

    async fn run(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        self.core.run(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::message::ToolCall;

    fn state(plan: usize, current_step: usize, last: Message) -> PlanState {
        PlanState {
            messages: vec![Message::user("q"), last],
            plan: (0..plan).map(|i| format!("step {}", i)).collect(),
            current_step,
        }
    }

    #[test]
    fn execute_step_routing() {
        let call = ToolCall {
            id: None,
            name: "web_search".into(),
            arguments: "{}".into(),
        };
        let with_calls = Message::tool_request("", vec![call]);
        assert_eq!(route_from_execute_step(&state(2, 0, with_calls)), "tools");
        assert_eq!(
            route_from_execute_step(&state(2, 1, Message::assistant("done"))),
            "execute_step"
        );
        assert_eq!(
            route_from_execute_step(&state(2, 2, Message::assistant("done"))),
            "respond"
        );
        assert_eq!(
            route_from_execute_step(&state(0, 0, Message::assistant("plan"))),
            "respond"
        );
    }

    #[test]
    fn process_tools_routing() {
        assert_eq!(
            route_from_process_tools(&state(2, 1, Message::assistant("x"))),
            "execute_step"
        );
        assert_eq!(
            route_from_process_tools(&state(2, 2, Message::assistant("x"))),
            "respond"
        );
    }
}
