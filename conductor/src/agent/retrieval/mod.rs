//! Retrieval agent: single `retrieve` node over a knowledge store.

mod retrieve_node;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::graph::{StateGraph, END, START};
use crate::knowledge::{Document, KnowledgeStore};
use crate::message::Message;

use super::registry::AgentArgs;
use super::{Agent, AgentCore, AgentInput, AgentOutput, AgentState};

pub use retrieve_node::RetrieveNode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalState {
    pub messages: Vec<Message>,
    /// Question of the current run: the last input message.
    pub question: String,
    /// Documents retrieved by the current run, deduplicated by identity.
    pub documents: Vec<Document>,
}

impl AgentState for RetrievalState {
    fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    fn documents(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn apply_input(&mut self, inputs: &[String]) {
        self.messages
            .extend(inputs.iter().map(|m| Message::user(m.as_str())));
        self.question = inputs.last().cloned().unwrap_or_default();
    }
}

pub struct RetrievalAgent {
    core: AgentCore<RetrievalState>,
    store: Arc<dyn KnowledgeStore>,
}

impl RetrievalAgent {
    pub const NAME: &'static str = "retrieval";
    pub const DESCRIPTION: &'static str = "Retrieves relevant documents from the knowledge base";

    /// Requires `args.knowledge`.
    pub fn new(args: AgentArgs) -> Result<Self, AgentError> {
        let store = args.knowledge.clone().ok_or_else(|| {
            AgentError::InvalidConfig("retrieval agent requires a knowledge store".into())
        })?;
        let mut core = AgentCore::new(Self::NAME, Self::DESCRIPTION, args.thread_id, args.model)
            .with_recursion_limit(args.settings.recursion_limit);

        let retrieve = RetrieveNode::new(
            core.model().clone(),
            store.clone(),
            args.settings.top_k,
            args.settings.query_variants,
        );
        let mut graph = StateGraph::<RetrievalState>::new();
        graph.add_node("retrieve", Arc::new(retrieve));
        graph.add_edge(START, "retrieve");
        graph.add_edge("retrieve", END);
        core.install(graph)?;

        Ok(Self { core, store })
    }

    /// Latest checkpointed state of this thread.
    pub async fn state(&self) -> Result<Option<RetrievalState>, AgentError> {
        self.core.latest_state().await
    }
}

#[async_trait]
impl Agent for RetrievalAgent {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn description(&self) -> &str {
        self.core.description()
    }

    fn thread_id(&self) -> &str {
        self.core.thread_id()
    }

    async fn run(&self, input: AgentInput) -> Result<AgentOutput, AgentError> {
        self.core.run(input).await
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, AgentError> {
        let documents = documents.into_iter().map(Document::with_identity).collect();
        let added = self.store.add(documents).await?;
        tracing::info!(thread_id = %self.core.thread_id(), added, "documents ingested");
        Ok(added)
    }
}
