//! Mock LLM for tests and offline runs.
//!
//! Replies are scripted up front and consumed in order; every call is recorded
//! (messages plus the names of the tools offered) so tests can assert on what
//! the agents sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

/// One scripted reply.
#[derive(Debug, Clone, Default)]
pub struct MockReply {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// Reply whose text is the serialized JSON value (for structured calls).
    pub fn json(value: serde_json::Value) -> Self {
        Self::text(value.to_string())
    }

    /// Reply requesting a single tool call with `call-<name>` as id.
    pub fn tool_call(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        let name = name.into();
        Self {
            content: String::new(),
            tool_calls: vec![ToolCall {
                id: Some(format!("call-{}", name)),
                name,
                arguments: arguments.to_string(),
            }],
        }
    }

    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }
}

/// A recorded call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub messages: Vec<Message>,
    /// Names of the tools offered; empty for plain calls.
    pub tools: Vec<String>,
}

/// Mock LLM: scripted replies in order, with an optional fallback once exhausted.
pub struct MockLlm {
    replies: Mutex<VecDeque<MockReply>>,
    fallback: Option<MockReply>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockLlm {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock that always answers with the same text.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new(vec![]).with_fallback(MockReply::text(content))
    }

    /// Reply used once the scripted queue is empty.
    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    /// Appends a reply to the script.
    pub fn push(&self, reply: MockReply) {
        if let Ok(mut q) = self.replies.lock() {
            q.push_back(reply);
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|q| q.len()).unwrap_or(0)
    }

    fn next_reply(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<LlmResponse, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                messages: messages.to_vec(),
                tools: tools.iter().map(|t| t.name.clone()).collect(),
            });
        }
        let scripted = self
            .replies
            .lock()
            .map_err(|_| AgentError::ExecutionFailed("MockLlm lock poisoned".into()))?
            .pop_front();
        let reply = scripted.or_else(|| self.fallback.clone()).ok_or_else(|| {
            AgentError::ExecutionFailed("MockLlm: no scripted reply left".into())
        })?;
        Ok(LlmResponse {
            content: reply.content,
            tool_calls: reply.tool_calls,
            usage: None,
        })
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.next_reply(messages, &[])
    }

    async fn invoke_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        self.next_reply(messages, tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Scripted replies come back in order, then the fallback, and calls are recorded.
    #[tokio::test]
    async fn scripted_then_fallback() {
        let mock = MockLlm::new(vec![MockReply::text("one"), MockReply::tool_call("t", serde_json::json!({}))])
            .with_fallback(MockReply::text("again"));
        let msgs = [Message::user("q")];
        assert_eq!(mock.invoke(&msgs).await.unwrap().content, "one");
        let second = mock.invoke(&msgs).await.unwrap();
        assert_eq!(second.tool_calls[0].name, "t");
        assert_eq!(second.tool_calls[0].id.as_deref(), Some("call-t"));
        assert_eq!(mock.invoke(&msgs).await.unwrap().content, "again");
        assert_eq!(mock.calls().len(), 3);
        assert_eq!(mock.remaining(), 0);
    }

    /// **Scenario**: An exhausted script without fallback is an execution failure.
    #[tokio::test]
    async fn exhausted_script_fails() {
        let mock = MockLlm::new(vec![]);
        let err = mock.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, AgentError::ExecutionFailed(_)));
    }
}
