//! Retrieve node: expand the question, fetch top-k per query, merge by identity.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::agent::prompts::query_expansion_prompt;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::knowledge::{merge_documents, Document, DocumentsUpdate, KnowledgeStore};
use crate::llm::{structured, LlmClient, QueryExpansion};
use crate::message::Message;

use super::RetrievalState;

/// Characters of each document quoted in the summary message.
const EXCERPT_CHARS: usize = 500;

pub struct RetrieveNode {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn KnowledgeStore>,
    top_k: usize,
    query_variants: usize,
}

impl RetrieveNode {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn KnowledgeStore>,
        top_k: usize,
        query_variants: usize,
    ) -> Self {
        Self {
            llm,
            store,
            top_k,
            query_variants,
        }
    }

    /// The question first, then up to `query_variants` distinct reformulations.
    async fn expand(&self, question: &str) -> Result<Vec<String>, AgentError> {
        let mut queries = vec![question.to_string()];
        if self.query_variants == 0 {
            return Ok(queries);
        }
        let prompt = Message::user(query_expansion_prompt(question, self.query_variants));
        let expansion: QueryExpansion = structured(self.llm.as_ref(), &[prompt]).await?;
        for q in expansion.queries {
            let q = q.trim();
            if q.is_empty() || queries.iter().any(|existing| existing == q) {
                continue;
            }
            if queries.len() > self.query_variants {
                break;
            }
            queries.push(q.to_string());
        }
        Ok(queries)
    }
}

fn excerpt(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        flat
    } else {
        format!("{}...", flat.chars().take(EXCERPT_CHARS).collect::<String>())
    }
}

/// `Retrieving N documents relevant to the query.` plus one numbered excerpt per document.
pub(super) fn summary_message(documents: &[Document]) -> String {
    let mut text = format!(
        "Retrieving {} documents relevant to the query.",
        documents.len()
    );
    for (i, doc) in documents.iter().enumerate() {
        text.push_str(&format!("\n\n[{}] {}", i + 1, excerpt(&doc.content)));
    }
    text
}

#[async_trait]
impl Node<RetrievalState> for RetrieveNode {
    fn id(&self) -> &str {
        "retrieve"
    }

    async fn run(&self, state: RetrievalState) -> Result<(RetrievalState, Next), AgentError> {
        let RetrievalState {
            mut messages,
            question,
            documents,
        } = state;
        let mut documents = merge_documents(documents, DocumentsUpdate::Delete);

        if !question.trim().is_empty() {
            let queries = self.expand(&question).await?;
            tracing::debug!(queries = queries.len(), top_k = self.top_k, "retrieval queries");
            let batches =
                try_join_all(queries.iter().map(|q| self.store.query(q, self.top_k))).await?;
            for found in batches {
                let found = found.into_iter().map(Document::with_identity).collect();
                documents = merge_documents(documents, DocumentsUpdate::Merge(found));
            }
        }

        messages.push(Message::assistant(summary_message(&documents)));
        Ok((
            RetrievalState {
                messages,
                question,
                documents,
            },
            Next::Continue,
        ))
    }
}
