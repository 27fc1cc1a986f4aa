//! One conversation thread as seen from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use conductor::{
    ChatMessage, ChatOpenAI, ChatService, OpenAIEmbedder, Settings, SubmitResponse,
};

use crate::{read_documents, CliError};

/// Service backed by OpenAI chat and embeddings, configured from `settings`.
pub fn build_service(settings: Settings) -> ChatService {
    let model = Arc::new(ChatOpenAI::new(settings.model.clone()));
    let embedder = Arc::new(OpenAIEmbedder::new(settings.embedding_model.clone()));
    ChatService::new(model, embedder, settings)
}

/// Tracks the current thread id across turns; the first turn creates the thread.
pub struct Session {
    service: Arc<ChatService>,
    thread_id: Option<String>,
}

impl Session {
    pub fn new(service: Arc<ChatService>, thread_id: Option<String>) -> Self {
        Self { service, thread_id }
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn service(&self) -> &ChatService {
        &self.service
    }

    pub async fn ask(&mut self, message: &str) -> Result<SubmitResponse, CliError> {
        let res = self.service.submit(self.thread_id.clone(), message).await?;
        self.thread_id = Some(res.thread_id.clone());
        Ok(res)
    }

    /// Reads `paths` and ingests them, opening the thread first if needed.
    /// Returns the number of chunks added.
    pub async fn ingest(&mut self, paths: &[PathBuf]) -> Result<usize, CliError> {
        let documents = read_documents(paths)?;
        let thread_id = self.service.open(self.thread_id.clone())?;
        self.thread_id = Some(thread_id.clone());
        let added = self.service.ingest(&thread_id, documents).await?;
        tracing::info!(thread_id = %thread_id, files = paths.len(), added, "ingested files");
        Ok(added)
    }

    pub async fn history(&self) -> Result<Vec<ChatMessage>, CliError> {
        match &self.thread_id {
            Some(id) => Ok(self.service.get_history(id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Drops the current thread; the next turn starts a new one.
    pub fn reset(&mut self) -> Result<(), CliError> {
        if let Some(id) = self.thread_id.take() {
            self.service.delete(&id)?;
        }
        Ok(())
    }
}
