//! Chat service: conversation threads over the agent system.
//!
//! Each thread id owns one [`ThreadSlot`]: an orchestrator with its managed
//! planning and retrieval agents (all built through the agent registry), the
//! thread's knowledge store, and the user-visible history. Distinct threads run
//! concurrently; a second `submit` on a busy thread is rejected with
//! [`ServiceError::Busy`].

mod error;

pub use error::ServiceError;

use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::agent::{Agent, AgentArgs, AgentInfo, AgentInput, AgentRegistry};
use crate::error::AgentError;
use crate::knowledge::{
    content_hash, random_id, Document, Embedder, InMemoryKnowledgeStore, KnowledgeStore,
    TextSplitter,
};
use crate::llm::LlmClient;
use crate::settings::Settings;
use crate::tools::{ToolRegistry, WebSearchTool};

/// One history entry as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub thread_id: String,
    pub reply: String,
}

/// Raw uploaded text; `source` is the file name.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: String,
    pub content: String,
}

/// Agents and history of one conversation thread.
pub struct ThreadSlot {
    orchestrator: Arc<dyn Agent>,
    retrieval: Arc<dyn Agent>,
    /// Held for the whole of a submit.
    running: Mutex<()>,
    /// Locked only to read or append.
    history: Mutex<Vec<ChatMessage>>,
}

pub struct ChatService {
    model: Arc<dyn LlmClient>,
    embedder: Arc<dyn Embedder>,
    settings: Settings,
    registry: &'static AgentRegistry,
    threads: DashMap<String, Arc<ThreadSlot>>,
}

impl ChatService {
    pub fn new(model: Arc<dyn LlmClient>, embedder: Arc<dyn Embedder>, settings: Settings) -> Self {
        Self {
            model,
            embedder,
            settings,
            registry: AgentRegistry::global(),
            threads: DashMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn tools(&self) -> ToolRegistry {
        let mut tools = ToolRegistry::new();
        if let Some(key) = &self.settings.tavily_api_key {
            tools.register(Arc::new(WebSearchTool::new(key.clone())));
        }
        tools
    }

    /// Builds planning + retrieval managed by an orchestrator, all for `thread_id`.
    fn build_slot(&self, thread_id: &str) -> Result<Arc<ThreadSlot>, AgentError> {
        let knowledge: Arc<dyn KnowledgeStore> =
            Arc::new(InMemoryKnowledgeStore::new(self.embedder.clone()));
        let base = AgentArgs::new(thread_id, self.model.clone())
            .with_settings(self.settings.clone());

        let planning = self
            .registry
            .create("planning", base.clone().with_tools(self.tools()))?;
        let retrieval = self
            .registry
            .create("retrieval", base.clone().with_knowledge(knowledge))?;
        let orchestrator = self.registry.create(
            "orchestrator",
            base.with_managed_agents(vec![planning, retrieval.clone()]),
        )?;
        tracing::info!(thread_id, "thread created");
        Ok(Arc::new(ThreadSlot {
            orchestrator,
            retrieval,
            running: Mutex::new(()),
            history: Mutex::new(Vec::new()),
        }))
    }

    fn slot(&self, thread_id: &str) -> Result<Arc<ThreadSlot>, ServiceError> {
        self.threads
            .get(thread_id)
            .map(|s| s.value().clone())
            .ok_or_else(|| ServiceError::NotFound(thread_id.to_string()))
    }

    fn open_slot(&self, thread_id: Option<String>) -> Result<(String, Arc<ThreadSlot>), ServiceError> {
        let thread_id = thread_id
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(random_id);
        let slot = self
            .threads
            .entry(thread_id.clone())
            .or_try_insert_with(|| self.build_slot(&thread_id))?
            .value()
            .clone();
        Ok((thread_id, slot))
    }

    /// Creates the thread if it does not exist yet and returns its id.
    ///
    /// Lets callers ingest documents before the first message.
    pub fn open(&self, thread_id: Option<String>) -> Result<String, ServiceError> {
        self.open_slot(thread_id).map(|(id, _)| id)
    }

    /// Runs one user message through the thread's orchestrator.
    ///
    /// A new (or absent) id creates the thread. The history gains the user and
    /// assistant entries only when the run succeeds. A thread deleted while the
    /// run was in flight yields [`ServiceError::NotFound`].
    pub async fn submit(
        &self,
        thread_id: Option<String>,
        message: impl Into<String>,
    ) -> Result<SubmitResponse, ServiceError> {
        let message = message.into();
        let (thread_id, slot) = self.open_slot(thread_id)?;

        let _running = slot
            .running
            .try_lock()
            .map_err(|_| ServiceError::Busy(thread_id.clone()))?;
        let output = slot
            .orchestrator
            .run(AgentInput::user(message.clone()))
            .await
            .map_err(|e| {
                tracing::error!(thread_id = %thread_id, error = %e, "submit failed");
                ServiceError::Internal(e)
            })?;
        let reply = output.reply().unwrap_or_default().to_string();

        let live = self
            .threads
            .get(&thread_id)
            .is_some_and(|s| Arc::ptr_eq(s.value(), &slot));
        if !live {
            tracing::warn!(thread_id = %thread_id, "thread deleted during submit");
            return Err(ServiceError::NotFound(thread_id));
        }
        let mut history = slot.history.lock().await;
        history.push(ChatMessage::new("user", message));
        history.push(ChatMessage::new("assistant", reply.clone()));
        Ok(SubmitResponse { thread_id, reply })
    }

    /// User-visible history of the thread, oldest first.
    pub async fn get_history(&self, thread_id: &str) -> Result<Vec<ChatMessage>, ServiceError> {
        let slot = self.slot(thread_id)?;
        let history = slot.history.lock().await.clone();
        Ok(history)
    }

    /// Drops the thread with its agents, checkpoints and knowledge store.
    pub fn delete(&self, thread_id: &str) -> Result<String, ServiceError> {
        self.threads
            .remove(thread_id)
            .ok_or_else(|| ServiceError::NotFound(thread_id.to_string()))?;
        tracing::info!(thread_id, "thread deleted");
        Ok(format!("chat '{}' deleted successfully", thread_id))
    }

    /// Splits `.txt` documents into chunks and adds them to the thread's knowledge store.
    ///
    /// Each chunk is its own identity (content hash of the chunk) and keeps the
    /// source file name plus the hash of the whole file. Returns the chunks added.
    pub async fn ingest(
        &self,
        thread_id: &str,
        documents: Vec<RawDocument>,
    ) -> Result<usize, ServiceError> {
        let slot = self.slot(thread_id)?;
        if let Some(bad) = documents.iter().find(|d| !is_text_file(&d.source)) {
            return Err(ServiceError::BadRequest(format!(
                "Unsupported file type: {}",
                bad.source
            )));
        }
        let splitter = TextSplitter::new(self.settings.chunk_size, self.settings.chunk_overlap)
            .map_err(AgentError::from)?;

        let chunks: Vec<Document> = documents
            .iter()
            .flat_map(|raw| {
                let file_hash = content_hash(&raw.content);
                splitter.split(&raw.content).into_iter().map(move |chunk| {
                    Document::new(chunk)
                        .with_metadata("source", raw.source.clone())
                        .with_metadata("document_uuid", file_hash.clone())
                        .with_identity()
                })
            })
            .collect();
        let added = slot.retrieval.add_documents(chunks).await?;
        Ok(added)
    }

    /// Registered agent types with their descriptions.
    pub fn list_agents(&self) -> Vec<AgentInfo> {
        self.registry.list_agents()
    }

    pub fn thread_ids(&self) -> Vec<String> {
        self.threads.iter().map(|e| e.key().clone()).collect()
    }
}

fn is_text_file(source: &str) -> bool {
    source.rsplit_once('.').map(|(_, ext)| ext) == Some("txt")
}
