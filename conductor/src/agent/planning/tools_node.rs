//! Tools node: run every call of the last tool request, one result message per call.
//!
//! Tool failures (unknown tool, bad arguments, transport) become result messages
//! for the model to read; they never abort the run.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::{Message, ToolCall};
use crate::tool_source::{ToolSource, ToolSourceError};

use super::PlanState;

pub struct ToolsNode {
    tools: Arc<dyn ToolSource>,
}

impl ToolsNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self { tools }
    }

    async fn call(&self, call: &ToolCall) -> Result<String, ToolSourceError> {
        let args = parse_arguments(&call.arguments)?;
        let content = self.tools.call_tool(&call.name, args).await?;
        Ok(content.text)
    }
}

/// Empty arguments mean `{}`; anything else must be a JSON object.
fn parse_arguments(raw: &str) -> Result<Value, ToolSourceError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ Value::Object(_)) => Ok(v),
        Ok(other) => Err(ToolSourceError::InvalidInput(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(ToolSourceError::InvalidInput(e.to_string())),
    }
}

pub(super) fn tool_error_message(call: &ToolCall, error: &ToolSourceError) -> String {
    format!(
        "Error executing tool '{}' with arguments {}: {}",
        call.name, call.arguments, error
    )
}

#[async_trait]
impl Node<PlanState> for ToolsNode {
    fn id(&self) -> &str {
        "tools"
    }

    async fn run(&self, state: PlanState) -> Result<(PlanState, Next), AgentError> {
        let calls = match state.messages.last() {
            Some(Message::ToolRequest { tool_calls, .. }) => tool_calls.clone(),
            _ => Vec::new(),
        };
        // Calls run concurrently; results keep the request order.
        let results = join_all(calls.iter().map(|call| self.call(call))).await;
        let mut state = state;
        for (call, result) in calls.iter().zip(results) {
            let content = match result {
                Ok(text) => {
                    tracing::debug!(tool = %call.name, "tool call succeeded");
                    text
                }
                Err(e) => {
                    tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                    tool_error_message(call, &e)
                }
            };
            state.messages.push(Message::tool_result(call, content));
        }
        Ok((state, Next::Continue))
    }
}
