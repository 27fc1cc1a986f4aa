//! In-memory knowledge store with semantic search via embeddings.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Document, Embedder, KnowledgeError, KnowledgeStore};

struct Entry {
    document: Document,
    vector: Vec<f32>,
}

/// Knowledge store kept in process memory; one per conversation thread.
pub struct InMemoryKnowledgeStore {
    entries: RwLock<Vec<Entry>>,
    embedder: Arc<dyn Embedder>,
}

impl InMemoryKnowledgeStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            embedder,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns 0.0 if either vector has zero magnitude.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot_product / (norm_a * norm_b)
        }
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn add(&self, documents: Vec<Document>) -> Result<usize, KnowledgeError> {
        let mut seen: HashSet<String> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .filter_map(|e| e.document.uuid().map(String::from))
                .collect()
        };
        let fresh: Vec<Document> = documents
            .into_iter()
            .map(Document::with_identity)
            .filter(|d| seen.insert(d.uuid().unwrap_or_default().to_string()))
            .collect();
        if fresh.is_empty() {
            return Ok(0);
        }

        let texts: Vec<&str> = fresh.iter().map(|d| d.content.as_str()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != fresh.len() {
            return Err(KnowledgeError::Embedding(format!(
                "expected {} vectors, got {}",
                fresh.len(),
                vectors.len()
            )));
        }

        let mut entries = self.entries.write().await;
        // Another add may have landed while embedding.
        let present: HashSet<String> = entries
            .iter()
            .filter_map(|e| e.document.uuid().map(String::from))
            .collect();
        let mut added = 0;
        for (document, vector) in fresh.into_iter().zip(vectors) {
            if document.uuid().map_or(false, |id| present.contains(id)) {
                continue;
            }
            entries.push(Entry { document, vector });
            added += 1;
        }
        tracing::debug!(added, total = entries.len(), "knowledge store add");
        Ok(added)
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<Document>, KnowledgeError> {
        if k == 0 || self.entries.read().await.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self
            .embedder
            .embed(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| KnowledgeError::Embedding("No vector returned".into()))?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, Self::cosine_similarity(&query_vec, &e.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, _)| entries[i].document.clone())
            .collect())
    }
}
