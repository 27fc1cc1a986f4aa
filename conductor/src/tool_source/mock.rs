//! Mock tool source for tests: fixed tool list, canned results, recorded calls.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Canned outcome for one tool name.
#[derive(Debug, Clone)]
enum Outcome {
    Text(String),
    Fail(String),
}

/// Mock tool source: each registered tool returns a fixed text or a transport error.
#[derive(Default)]
pub struct MockToolSource {
    specs: Vec<ToolSpec>,
    outcomes: HashMap<String, Outcome>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockToolSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn spec(name: &str) -> ToolSpec {
        ToolSpec {
            name: name.to_string(),
            description: Some(format!("mock tool {}", name)),
            input_schema: serde_json::json!({ "type": "object" }),
        }
    }

    /// Adds a tool that returns `text` on every call.
    pub fn with_tool(mut self, name: &str, text: impl Into<String>) -> Self {
        self.specs.push(Self::spec(name));
        self.outcomes.insert(name.to_string(), Outcome::Text(text.into()));
        self
    }

    /// Adds a tool that fails with a transport error on every call.
    pub fn with_failing_tool(mut self, name: &str, error: impl Into<String>) -> Self {
        self.specs.push(Self::spec(name));
        self.outcomes.insert(name.to_string(), Outcome::Fail(error.into()));
        self
    }

    /// Calls made so far: (tool name, arguments).
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.specs.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((name.to_string(), arguments));
        }
        match self.outcomes.get(name) {
            Some(Outcome::Text(text)) => Ok(ToolCallContent::from(text.clone())),
            Some(Outcome::Fail(e)) => Err(ToolSourceError::Transport(e.clone())),
            None => Err(ToolSourceError::NotFound(name.to_string())),
        }
    }
}
