use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::common::generate_uuid_v7;

pub const METADATA_FILE_NAME: &str = "file_name";
pub const METADATA_PAGE_NUMBER: &str = "page_number";
pub const METADATA_SOURCE_CHECKSUM: &str = "source_checksum";
pub const METADATA_INGESTED_AT: &str = "ingested_at";

/// A span of text with its metadata, as read from a source or stored in the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Similarity to the query, only set on search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Document {
    pub fn new(content: String, metadata: Map<String, Value>) -> Self {
        Self {
            id: generate_uuid_v7(),
            content,
            metadata,
            score: None,
        }
    }

    /// New document with its own id, the given content and a copy of this metadata.
    pub fn derive(&self, content: String) -> Self {
        Self::new(content, self.metadata.clone())
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}
