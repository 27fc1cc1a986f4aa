//! What the planner sees of tools: a list of specs and a way to call one.
//!
//! [`ToolRegistry`](crate::tools::ToolRegistry) serves the built-in tools;
//! [`MockToolSource`] serves canned results in tests.

mod mock;

pub use mock::MockToolSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A tool as advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema of the arguments object.
    pub input_schema: Value,
}

/// Text a tool call produced.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    pub text: String,
}

impl From<String> for ToolCallContent {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Reported back to the model as a tool result; never fails a planning run.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("unknown tool '{0}'")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    /// The tool's backend could not be reached or answered with an error.
    #[error("tool backend failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_names_tool_or_cause() {
        assert_eq!(ToolSourceError::NotFound("x".into()).to_string(), "unknown tool 'x'");
        assert_eq!(
            ToolSourceError::Transport("503".into()).to_string(),
            "tool backend failed: 503"
        );
    }
}
