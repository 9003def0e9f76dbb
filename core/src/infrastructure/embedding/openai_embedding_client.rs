use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    domain::{
        common::{LLMConfig, entities::app_errors::CoreError},
        document::ports::EmbeddingClient,
    },
    infrastructure::llm::{endpoint, openai_http_client, post_json},
};

pub const EMBEDDING_BATCH_SIZE: usize = 100;

/// Embeddings client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingClient {
    client: Client,
    url: String,
    model: String,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl EmbeddingResponse {
    /// Vectors in input order; the count must match the number of inputs.
    fn into_vectors(mut self, expected: usize) -> Result<Vec<Vec<f32>>, CoreError> {
        if self.data.len() != expected {
            tracing::error!(
                "Embedding API returned {} embeddings for {} inputs",
                self.data.len(),
                expected
            );
            return Err(CoreError::ExternalServiceError(format!(
                "Embedding API returned {} embeddings for {} inputs",
                self.data.len(),
                expected
            )));
        }
        self.data.sort_by_key(|entry| entry.index);
        Ok(self.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

impl OpenAIEmbeddingClient {
    pub fn new(config: &LLMConfig) -> Result<Self, CoreError> {
        Ok(Self {
            client: openai_http_client(&config.api_key, config.timeout)?,
            url: endpoint(&config.base_url, "embeddings"),
            model: config.embedding_model.clone(),
            batch_size: EMBEDDING_BATCH_SIZE,
        })
    }
}

impl EmbeddingClient for OpenAIEmbeddingClient {
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<Vec<f32>>, CoreError> {
        let mut vectors = Vec::with_capacity(inputs.len());

        for batch in inputs.chunks(self.batch_size) {
            debug!(inputs = batch.len(), "Requesting embeddings");
            let request = EmbeddingRequest {
                model: &self.model,
                input: batch,
            };
            let response: EmbeddingResponse =
                post_json(&self.client, &self.url, &request, "Embedding").await?;
            vectors.extend(response.into_vectors(batch.len())?);
        }

        Ok(vectors)
    }
}
