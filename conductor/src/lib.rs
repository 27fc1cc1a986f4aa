//! # Conductor
//!
//! Multi-agent orchestration runtime: an orchestrator that answers directly or
//! delegates to a planning agent (plan, execute steps with tools, answer) or a
//! retrieval agent (query expansion over a knowledge store). Every agent runs a
//! checkpointed state graph bound to one conversation thread, so consecutive
//! runs on a thread continue where the last completed one stopped.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`], [`RouteFn`].
//! - [`memory`]: [`RunnableConfig`], [`Checkpoint`], [`Checkpointer`], [`MemorySaver`].
//! - [`agent`]: [`Agent`], [`AgentRegistry`], [`OrchestratorAgent`], [`PlanningAgent`], [`RetrievalAgent`].
//! - [`llm`]: [`LlmClient`], [`ChatOpenAI`], [`MockLlm`], structured output types.
//! - [`knowledge`]: [`Document`], [`KnowledgeStore`], [`InMemoryKnowledgeStore`], [`TextSplitter`].
//! - [`tools`] / [`tool_source`]: [`Tool`], [`ToolRegistry`], [`WebSearchTool`], [`ToolSource`].
//! - [`service`]: [`ChatService`], the thread-level interface used by the CLI.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use conductor::{ChatOpenAI, ChatService, OpenAIEmbedder, Settings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), conductor::ServiceError> {
//! let settings = Settings::from_env();
//! let model = Arc::new(ChatOpenAI::new(settings.model.clone()));
//! let embedder = Arc::new(OpenAIEmbedder::new(settings.embedding_model.clone()));
//! let service = ChatService::new(model, embedder, settings);
//! let res = service.submit(None, "hello").await?;
//! println!("[{}] {}", res.thread_id, res.reply);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod knowledge;
pub mod llm;
pub mod memory;
pub mod message;
pub mod service;
pub mod settings;
pub mod tool_source;
pub mod tools;

pub use agent::{
    register_builtin_agents, Agent, AgentArgs, AgentConstructor, AgentCore, AgentInfo,
    AgentInput, AgentOutput, AgentRegistry, AgentState, OrchestratorAgent, OrchestratorState,
    PlanState, PlanningAgent, RetrievalAgent, RetrievalState,
};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, Next, Node, RouteFn, StateGraph, END, START,
};
pub use knowledge::{
    merge_documents, Document, DocumentsUpdate, Embedder, HashingEmbedder,
    InMemoryKnowledgeStore, KnowledgeError, KnowledgeStore, OpenAIEmbedder, TextSplitter,
};
pub use llm::{
    bind_tools, ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, MockReply, Plan,
    QueryExpansion, RouteDecision,
};
pub use memory::{
    Checkpoint, CheckpointError, CheckpointSummary, Checkpointer, MemorySaver, RunnableConfig,
};
pub use message::{Message, ToolCall};
pub use service::{ChatMessage, ChatService, RawDocument, ServiceError, SubmitResponse};
pub use settings::Settings;
pub use tool_source::{MockToolSource, ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{Tool, ToolRegistry, WebSearchTool};
