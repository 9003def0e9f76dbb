use std::future::Future;

use bytes::Bytes;

use crate::domain::{
    common::entities::app_errors::CoreError,
    document::{
        entities::Document,
        value_objects::{IngestDocumentInput, IngestionReport, PdfReaderConfig, SearchRequest},
    },
};

/// Reads a PDF into one document per page with non-blank text.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentReader: Send + Sync {
    fn read(
        &self,
        file_name: String,
        data: Bytes,
        config: PdfReaderConfig,
    ) -> impl Future<Output = Result<Vec<Document>, CoreError>> + Send;
}

/// Embedding model client; returns one vector per input, in input order.
#[cfg_attr(test, mockall::automock)]
pub trait EmbeddingClient: Send + Sync {
    fn embed(
        &self,
        inputs: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, CoreError>> + Send;
}

/// Append-only store of embedded documents.
#[cfg_attr(test, mockall::automock)]
pub trait VectorStore: Send + Sync {
    fn add(&self, documents: Vec<Document>) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Documents with a similarity of at least `similarity_threshold`, best
    /// first, at most `top_k`. Each result carries its score.
    fn similarity_search(
        &self,
        request: SearchRequest,
    ) -> impl Future<Output = Result<Vec<Document>, CoreError>> + Send;
}

/// Service trait for the document ingestion pipeline
#[cfg_attr(test, mockall::automock)]
pub trait DocumentService: Send + Sync {
    fn ingest_document(
        &self,
        input: IngestDocumentInput,
    ) -> impl Future<Output = Result<IngestionReport, CoreError>> + Send;
}
