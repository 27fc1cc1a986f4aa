//! [`Embedder`] backed by the OpenAI embeddings endpoint.

use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;

use super::{Embedder, KnowledgeError};

pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedder {
    /// Client keyed by `OPENAI_API_KEY`.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    /// One request per batch; vectors come back in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, KnowledgeError> {
        let input = match texts {
            [] => return Ok(Vec::new()),
            [one] => EmbeddingInput::String(one.to_string()),
            many => EmbeddingInput::StringArray(many.iter().map(|t| t.to_string()).collect()),
        };
        let request = CreateEmbeddingRequest {
            model: self.model.clone(),
            input,
            ..Default::default()
        };
        tracing::debug!(model = %self.model, texts = texts.len(), "embedding batch");
        let mut response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| KnowledgeError::Embedding(e.to_string()))?;
        if response.data.len() != texts.len() {
            return Err(KnowledgeError::Embedding(format!(
                "asked for {} vectors, received {}",
                texts.len(),
                response.data.len()
            )));
        }
        response.data.sort_by_key(|e| e.index);
        Ok(response.data.into_iter().map(|e| e.embedding).collect())
    }

    /// `text-embedding-3-large` is 3072 wide; the smaller OpenAI models are 1536.
    fn dimension(&self) -> usize {
        if self.model == "text-embedding-3-large" {
            3072
        } else {
            1536
        }
    }
}
