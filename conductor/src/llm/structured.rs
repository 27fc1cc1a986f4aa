//! Structured output: schema types for each decision point and JSON extraction.
//!
//! Every place where a model decision drives control flow has an explicit
//! contract type: [`RouteDecision`] (orchestrator), [`Plan`] (planner),
//! [`QueryExpansion`] (retriever). Models produce them via
//! `LlmClient::invoke_structured`; [`structured`] parses the value into the type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;

/// Attempts the default extraction makes before giving up.
const MAX_ATTEMPTS: usize = 2;

/// Named JSON schema handed to the model.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

/// A Rust type a model can be asked to produce.
pub trait StructuredOutput: DeserializeOwned {
    fn schema() -> OutputSchema;
}

/// Orchestrator routing decision: an agent name or the `none` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    #[serde(default)]
    pub reason: String,
    pub chosen_agent: String,
}

impl StructuredOutput for RouteDecision {
    fn schema() -> OutputSchema {
        OutputSchema {
            name: "route_decision".into(),
            description: "Which agent should handle the request, or 'none' to answer directly"
                .into(),
            schema: json!({
                "type": "object",
                "properties": {
                    "reason": {
                        "type": "string",
                        "description": "Why this agent is the best fit for the request"
                    },
                    "chosen_agent": {
                        "type": "string",
                        "description": "Name of the agent to use, or 'none' to respond directly"
                    }
                },
                "required": ["reason", "chosen_agent"],
                "additionalProperties": false
            }),
        }
    }
}

/// Planner output: ordered step descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<String>,
}

impl StructuredOutput for Plan {
    fn schema() -> OutputSchema {
        OutputSchema {
            name: "plan".into(),
            description: "Ordered steps that together fulfil the user's request".into(),
            schema: json!({
                "type": "object",
                "properties": {
                    "steps": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Different steps to follow, in execution order"
                    }
                },
                "required": ["steps"],
                "additionalProperties": false
            }),
        }
    }
}

/// Retriever output: reformulations of the user's question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryExpansion {
    pub queries: Vec<String>,
}

impl StructuredOutput for QueryExpansion {
    fn schema() -> OutputSchema {
        OutputSchema {
            name: "query_expansion".into(),
            description: "Alternative search queries for the same question".into(),
            schema: json!({
                "type": "object",
                "properties": {
                    "queries": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Reformulated queries, each self-contained"
                    }
                },
                "required": ["queries"],
                "additionalProperties": false
            }),
        }
    }
}

/// Asks `llm` for a `T` and deserializes the structured reply.
pub async fn structured<T: StructuredOutput>(
    llm: &dyn LlmClient,
    messages: &[Message],
) -> Result<T, AgentError> {
    let schema = T::schema();
    let value = llm.invoke_structured(messages, &schema).await?;
    serde_json::from_value(value).map_err(|e| {
        AgentError::ExecutionFailed(format!("reply does not match {}: {}", schema.name, e))
    })
}

/// Default `invoke_structured`: instruct, parse, retry once with the parse error.
pub async fn extract_structured<L: LlmClient + ?Sized>(
    llm: &L,
    messages: &[Message],
    schema: &OutputSchema,
) -> Result<Value, AgentError> {
    let mut transcript = messages.to_vec();
    transcript.push(Message::system(format!(
        "Respond only with a JSON object named `{}` ({}) matching this JSON schema, without any other text:\n{}",
        schema.name, schema.description, schema.schema
    )));
    let mut last_error = String::new();
    for attempt in 1..=MAX_ATTEMPTS {
        let reply = llm.invoke(&transcript).await?;
        match parse_json_reply(&reply.content) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(schema = %schema.name, attempt, error = %e, "unparsable structured reply");
                last_error = e;
                transcript.push(Message::assistant(reply.content));
                transcript.push(Message::user(format!(
                    "That was not a valid JSON object ({}). Reply with the JSON object only.",
                    last_error
                )));
            }
        }
    }
    Err(AgentError::ExecutionFailed(format!(
        "model did not produce a valid {} after {} attempts: {}",
        schema.name, MAX_ATTEMPTS, last_error
    )))
}

/// Parses a JSON object out of a model reply.
///
/// Accepts bare JSON, JSON inside a Markdown code fence, or JSON surrounded by prose
/// (first `{` to last `}`).
pub fn parse_json_reply(raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);
    match serde_json::from_str::<Value>(unfenced) {
        Ok(v) if v.is_object() => return Ok(v),
        Ok(_) => {}
        Err(e) => {
            if !unfenced.contains('{') {
                return Err(e.to_string());
            }
        }
    }
    let start = unfenced.find('{');
    let end = unfenced.rfind('}');
    match (start, end) {
        (Some(s), Some(e)) if s < e => serde_json::from_str::<Value>(&unfenced[s..=e])
            .map_err(|err| err.to_string())
            .and_then(|v| {
                if v.is_object() {
                    Ok(v)
                } else {
                    Err("expected a JSON object".to_string())
                }
            }),
        _ => Err("expected a JSON object".to_string()),
    }
}
