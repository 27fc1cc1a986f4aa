//! Chat-model capability.
//!
//! Agents depend on [`LlmClient`]: send an ordered transcript, receive a reply,
//! optionally with tool-call requests (`invoke_with_tools` / [`bind_tools`]) or as
//! a structured value conforming to a schema (`invoke_structured`).
//!
//! Implementations: [`MockLlm`] (scripted replies, tests) and [`ChatOpenAI`]
//! (OpenAI Chat Completions).

mod mock;
mod openai;
mod structured;

pub use mock::{MockCall, MockLlm, MockReply};
pub use openai::ChatOpenAI;
pub use structured::{
    extract_structured, parse_json_reply, structured, OutputSchema, Plan, QueryExpansion,
    RouteDecision, StructuredOutput,
};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an LLM completion: assistant text and optional tool calls.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls requested in this turn; empty when the model answered in text.
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// LLM client: given messages, returns assistant text and optional tool_calls.
///
/// Implementations must be cheap to share (`Arc<dyn LlmClient>`); one bound model
/// serves every agent of every thread.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn without tools.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;

    /// Invoke one turn offering `tools`; the reply may carry tool-call requests.
    ///
    /// Default ignores the tools and calls `invoke`.
    async fn invoke_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let _ = tools;
        self.invoke(messages).await
    }

    /// Invoke one turn and return a JSON value conforming to `schema`.
    ///
    /// Default asks for JSON through an appended instruction and parses the reply,
    /// retrying once on unparsable output (see [`extract_structured`]).
    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<Value, AgentError> {
        extract_structured(self, messages, schema).await
    }
}

/// Tool-aware variant of a model: `invoke` offers the bound tool set.
///
/// `invoke_structured` and explicit `invoke_with_tools` calls go to the inner model
/// unchanged.
pub struct ToolBoundLlm {
    inner: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
}

impl ToolBoundLlm {
    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }
}

/// Binds a tool set to a model, returning the tool-aware variant.
pub fn bind_tools(llm: Arc<dyn LlmClient>, tools: Vec<ToolSpec>) -> Arc<dyn LlmClient> {
    Arc::new(ToolBoundLlm { inner: llm, tools })
}

#[async_trait]
impl LlmClient for ToolBoundLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.inner.invoke_with_tools(messages, &self.tools).await
    }

    async fn invoke_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        self.inner.invoke_with_tools(messages, tools).await
    }

    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<Value, AgentError> {
        self.inner.invoke_structured(messages, schema).await
    }
}
