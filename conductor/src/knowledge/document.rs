use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

const UUID_KEY: &str = "uuid";

/// Hex SHA-256 of the text; the identity of a document without a caller-supplied id.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

pub fn random_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Content payload plus metadata; `metadata["uuid"]` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Identity key, if one is set and non-empty.
    pub fn uuid(&self) -> Option<&str> {
        self.metadata
            .get(UUID_KEY)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Fills in the content hash as identity when none is set.
    pub fn with_identity(mut self) -> Self {
        if self.uuid().is_none() {
            let id = content_hash(&self.content);
            self.metadata.insert(UUID_KEY.to_string(), Value::String(id));
        }
        self
    }
}

impl From<String> for Document {
    fn from(content: String) -> Self {
        Document::new(content).with_identity()
    }
}

impl From<&str> for Document {
    fn from(content: &str) -> Self {
        Document::from(content.to_string())
    }
}

/// Change applied to a document set.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentsUpdate {
    /// Append items whose identity is not yet present.
    Merge(Vec<Document>),
    /// Clear the set.
    Delete,
}

/// Applies `update` to `existing`.
///
/// Insertion order is kept; an incoming item whose identity already exists (in the
/// set or earlier in the same batch) is dropped, so the earlier copy wins.
pub fn merge_documents(existing: Vec<Document>, update: DocumentsUpdate) -> Vec<Document> {
    let incoming = match update {
        DocumentsUpdate::Delete => return Vec::new(),
        DocumentsUpdate::Merge(docs) => docs,
    };
    let mut out: Vec<Document> = existing.into_iter().map(Document::with_identity).collect();
    let mut seen: std::collections::HashSet<String> = out
        .iter()
        .filter_map(|d| d.uuid().map(String::from))
        .collect();
    for doc in incoming.into_iter().map(Document::with_identity) {
        let id = doc.uuid().map(String::from).unwrap_or_default();
        if seen.insert(id) {
            out.push(doc);
        }
    }
    out
}
