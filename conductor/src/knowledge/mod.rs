//! Knowledge store capability and the document model.
//!
//! - [`Document`] / [`DocumentsUpdate`] / [`merge_documents`]: identity-keyed document sets.
//! - [`KnowledgeStore`]: `add` documents, `query` top-k for a text.
//! - [`InMemoryKnowledgeStore`]: cosine similarity over an [`Embedder`].
//! - [`TextSplitter`]: recursive character splitter used when ingesting raw text.

mod document;
mod embedder;
mod in_memory;
mod openai_embedder;
mod splitter;

pub use document::{content_hash, merge_documents, random_id, Document, DocumentsUpdate};
pub use embedder::{Embedder, HashingEmbedder};
pub use in_memory::InMemoryKnowledgeStore;
pub use openai_embedder::OpenAIEmbedder;
pub use splitter::{TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from embedding, storing or querying documents.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("embedding error: {0}")]
    Embedding(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Knowledge store: documents in, ranked documents out.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Stores documents; identities already present are skipped. Returns how many were added.
    async fn add(&self, documents: Vec<Document>) -> Result<usize, KnowledgeError>;

    /// Up to `k` documents ranked by relevance to `text`, best first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<Document>, KnowledgeError>;
}
