//! [`LlmClient`] over the OpenAI Chat Completions API.
//!
//! Credentials come from `OPENAI_API_KEY` / `OPENAI_BASE_URL` unless a config is
//! passed in. Tool traffic already in the transcript is replayed as plain text
//! turns, which every OpenAI-compatible server accepts. Structured calls use a
//! strict `json_schema` response format.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, FunctionObject,
        ResponseFormat, ResponseFormatJsonSchema, ToolChoiceOptions,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::llm::{parse_json_reply, LlmClient, LlmResponse, LlmUsage, OutputSchema};
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

#[derive(Clone)]
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::default(), model)
    }

    /// Client for a non-default key or endpoint.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(self.model.as_str())
            .messages(messages.iter().map(wire_message).collect::<Vec<_>>());
        if !tools.is_empty() {
            builder
                .tools(tools.iter().map(function_tool).collect::<Vec<_>>())
                .tool_choice(ChatCompletionToolChoiceOption::Mode(ToolChoiceOptions::Auto));
        }
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        builder
            .build()
            .map_err(|e| AgentError::ExecutionFailed(format!("invalid chat request: {}", e)))
    }

    /// Tool-less request whose reply must match `schema` exactly.
    fn structured_request(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut request = self.request(messages, &[])?;
        request.response_format = Some(ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some(schema.description.clone()),
                name: schema.name.clone(),
                schema: Some(schema.schema.clone()),
                strict: Some(true),
            },
        });
        Ok(request)
    }

    async fn chat(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<LlmResponse, AgentError> {
        let request = self.request(messages, tools)?;
        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "chat completion"
        );
        self.send(request).await
    }

    async fn send(&self, request: CreateChatCompletionRequest) -> Result<LlmResponse, AgentError> {
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("chat completion failed: {}", e)))?;
        into_llm_response(response)
    }
}

fn wire_message(message: &Message) -> ChatCompletionRequestMessage {
    let user = |text: &str| {
        ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(text))
    };
    match message {
        Message::System(text) => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                text.as_str(),
            ))
        }
        Message::User(text) => user(text.as_str()),
        Message::Assistant(text) => ChatCompletionRequestMessage::Assistant(text.as_str().into()),
        Message::ToolRequest {
            content,
            tool_calls,
        } => ChatCompletionRequestMessage::Assistant(
            describe_calls(content, tool_calls).as_str().into(),
        ),
        Message::Tool { name, content, .. } => {
            user(format!("Tool {} returned: {}", name, content).as_str())
        }
    }
}

fn function_tool(spec: &ToolSpec) -> ChatCompletionTools {
    ChatCompletionTools::Function(ChatCompletionTool {
        function: FunctionObject {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: Some(spec.input_schema.clone()),
            ..Default::default()
        },
    })
}

/// Text form of a tool request: the model's own words, then one line per call.
fn describe_calls(content: &str, calls: &[ToolCall]) -> String {
    let lines = calls
        .iter()
        .map(|c| format!("Calling tool {} with {}", c.name, c.arguments));
    std::iter::once(content.to_string())
        .filter(|c| !c.is_empty())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

fn into_llm_response(response: CreateChatCompletionResponse) -> Result<LlmResponse, AgentError> {
    let usage = response.usage.map(|u| LlmUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(AgentError::ExecutionFailed(
            "chat completion returned no choices".to_string(),
        ));
    };
    let tool_calls = choice
        .message
        .tool_calls
        .into_iter()
        .flatten()
        .filter_map(|call| match call {
            ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall {
                id: Some(f.id),
                name: f.function.name,
                arguments: f.function.arguments,
            }),
            _ => None,
        })
        .collect();
    Ok(LlmResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        usage,
    })
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.chat(messages, &[]).await
    }

    async fn invoke_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        self.chat(messages, tools).await
    }

    async fn invoke_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<Value, AgentError> {
        let request = self.structured_request(messages, schema)?;
        tracing::debug!(model = %self.model, schema = %schema.name, "structured chat completion");
        let response = self.send(request).await?;
        parse_json_reply(&response.content).map_err(|e| {
            AgentError::ExecutionFailed(format!("reply does not match {}: {}", schema.name, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_call() -> ToolCall {
        ToolCall {
            id: Some("c1".into()),
            name: "web_search".into(),
            arguments: r#"{"query":"rust"}"#.into(),
        }
    }

    #[test]
    fn tool_traffic_becomes_text_turns() {
        let call = search_call();
        let wire: Vec<_> = [
            Message::system("sys"),
            Message::tool_request("", vec![call.clone()]),
            Message::tool_result(&call, "[]"),
        ]
        .iter()
        .map(wire_message)
        .collect();
        assert!(matches!(wire[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(wire[1], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(wire[2], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn call_description_keeps_model_text_first() {
        let call = search_call();
        assert_eq!(
            describe_calls("", &[call.clone()]),
            r#"Calling tool web_search with {"query":"rust"}"#
        );
        assert_eq!(
            describe_calls("looking", &[call]),
            "looking\nCalling tool web_search with {\"query\":\"rust\"}"
        );
    }

    #[test]
    fn request_offers_tools_only_when_given() {
        let client = ChatOpenAI::new("gpt-4o-mini").with_temperature(0.0);
        let spec = ToolSpec {
            name: "web_search".into(),
            description: Some("Search".into()),
            input_schema: serde_json::json!({"type": "object"}),
        };
        let plain = client.request(&[Message::user("hi")], &[]).unwrap();
        assert!(plain.tools.is_none());
        let with_tools = client.request(&[Message::user("hi")], &[spec]).unwrap();
        assert_eq!(with_tools.tools.map(|t| t.len()), Some(1));
        assert_eq!(with_tools.model, "gpt-4o-mini");
    }

    #[test]
    fn structured_request_pins_strict_schema() {
        use crate::llm::{Plan, StructuredOutput};

        let client = ChatOpenAI::new("gpt-4o-mini");
        let request = client
            .structured_request(&[Message::user("plan it")], &Plan::schema())
            .unwrap();
        assert!(request.tools.is_none());
        match request.response_format {
            Some(ResponseFormat::JsonSchema { json_schema }) => {
                assert_eq!(json_schema.name, "plan");
                assert_eq!(json_schema.strict, Some(true));
                assert_eq!(
                    json_schema.schema.map(|s| s["required"][0].clone()),
                    Some(serde_json::json!("steps"))
                );
            }
            other => panic!("expected json_schema response format, got {:?}", other),
        }
    }
}
