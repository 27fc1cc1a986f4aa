//! Transcript entries.
//!
//! Roles: System (framing, usually first), User, Assistant, plus the two tool
//! roles the planner produces: an assistant turn that requested tools and one
//! result entry per executed call.

use serde::{Deserialize, Serialize};

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider call id, echoed back on the matching result.
    pub id: Option<String>,
    pub name: String,
    /// JSON-encoded arguments as produced by the model.
    pub arguments: String,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// System prompt or ephemeral instruction.
    System(String),
    /// User input.
    User(String),
    /// Model/agent reply.
    Assistant(String),
    /// Assistant turn that asked for tool invocations.
    ToolRequest {
        content: String,
        tool_calls: Vec<ToolCall>,
    },
    /// Result (or error text) of one tool invocation.
    Tool {
        call_id: Option<String>,
        name: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    pub fn tool_request(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::ToolRequest {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool_result(call: &ToolCall, content: impl Into<String>) -> Self {
        Self::Tool {
            call_id: call.id.clone(),
            name: call.name.clone(),
            content: content.into(),
        }
    }

    /// Role name as exposed on the service boundary.
    pub fn role(&self) -> &'static str {
        match self {
            Message::System(_) => "system",
            Message::User(_) => "user",
            Message::Assistant(_) | Message::ToolRequest { .. } => "assistant",
            Message::Tool { .. } => "tool",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(s) | Message::User(s) | Message::Assistant(s) => s,
            Message::ToolRequest { content, .. } | Message::Tool { content, .. } => content,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }
}

/// Last user message in the transcript, if any.
pub fn last_user_message(messages: &[Message]) -> Option<&str> {
    messages.iter().rev().find(|m| m.is_user()).map(Message::content)
}
