use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// A built-in capability the planner can invoke by name.
///
/// `call` receives the arguments object the model produced; it should answer
/// malformed ones with `InvalidInput` and backend trouble with `Transport`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError>;
}
