use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::domain::{
    common::entities::app_errors::CoreError,
    document::{
        entities::Document,
        ports::{EmbeddingClient, VectorStore},
        value_objects::SearchRequest,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDocument {
    document: Document,
    embedding: Vec<f32>,
}

/// Vector store kept in process memory, ranked by cosine similarity.
///
/// With a snapshot path the content is loaded at startup and written back
/// after every append.
pub struct InMemoryVectorStore<E> {
    embedding_client: E,
    entries: RwLock<Vec<StoredDocument>>,
    snapshot_path: Option<PathBuf>,
}

impl<E> InMemoryVectorStore<E>
where
    E: EmbeddingClient,
{
    pub async fn new(embedding_client: E, snapshot_path: Option<PathBuf>) -> Result<Self, CoreError> {
        let entries = match &snapshot_path {
            Some(path) => load_snapshot(path).await?,
            None => Vec::new(),
        };

        Ok(Self {
            embedding_client,
            entries: RwLock::new(entries),
            snapshot_path,
        })
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn save_snapshot(&self, entries: &[StoredDocument]) -> Result<(), CoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let json = serde_json::to_vec(entries).map_err(|e| {
            error!("Failed to serialize vector store snapshot: {}", e);
            CoreError::VectorStoreError(format!("Failed to serialize snapshot: {}", e))
        })?;
        // Staged next to the target, then renamed over it
        let staging_path = staging_path(path);
        tokio::fs::write(&staging_path, json).await.map_err(|e| {
            error!(
                "Failed to write vector store snapshot {}: {}",
                staging_path.display(),
                e
            );
            CoreError::VectorStoreError(format!("Failed to write snapshot: {}", e))
        })?;
        tokio::fs::rename(&staging_path, path).await.map_err(|e| {
            error!("Failed to replace vector store snapshot {}: {}", path.display(), e);
            CoreError::VectorStoreError(format!("Failed to replace snapshot: {}", e))
        })?;

        debug!(entries = entries.len(), path = %path.display(), "Vector store snapshot saved");
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}

async fn load_snapshot(path: &Path) -> Result<Vec<StoredDocument>, CoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No vector store snapshot yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            error!("Failed to read vector store snapshot {}: {}", path.display(), e);
            return Err(CoreError::VectorStoreError(format!(
                "Failed to read snapshot: {}",
                e
            )));
        }
    };

    let entries: Vec<StoredDocument> = serde_json::from_slice(&bytes).map_err(|e| {
        error!("Failed to parse vector store snapshot {}: {}", path.display(), e);
        CoreError::VectorStoreError(format!("Failed to parse snapshot: {}", e))
    })?;

    info!(entries = entries.len(), path = %path.display(), "Vector store snapshot loaded");
    Ok(entries)
}

/// Cosine similarity of two vectors; 0.0 when either has no magnitude or
/// their dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

impl<E> VectorStore for InMemoryVectorStore<E>
where
    E: EmbeddingClient,
{
    async fn add(&self, documents: Vec<Document>) -> Result<(), CoreError> {
        if documents.is_empty() {
            return Ok(());
        }

        let contents = documents.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedding_client.embed(contents).await?;
        if embeddings.len() != documents.len() {
            error!(
                "Embedding client returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            );
            return Err(CoreError::VectorStoreError(
                "Embedding count does not match document count".to_string(),
            ));
        }

        let mut entries = self.entries.write().await;
        entries.extend(
            documents
                .into_iter()
                .zip(embeddings)
                .map(|(document, embedding)| StoredDocument {
                    document,
                    embedding,
                }),
        );
        debug!(entries = entries.len(), "Documents added to vector store");

        self.save_snapshot(&entries).await
    }

    async fn similarity_search(&self, request: SearchRequest) -> Result<Vec<Document>, CoreError> {
        if request.top_k == 0 || self.is_empty().await {
            return Ok(Vec::new());
        }

        let query = self
            .embedding_client
            .embed(vec![request.query])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                CoreError::VectorStoreError("No embedding returned for query".to_string())
            })?;

        let entries = self.entries.read().await;
        let mut scored = entries
            .iter()
            .map(|entry| (cosine_similarity(&query, &entry.embedding), entry))
            .filter(|(score, _)| *score >= request.similarity_threshold)
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(request.top_k)
            .map(|(score, entry)| entry.document.clone().with_score(score))
            .collect())
    }
}
