use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{error, info, instrument};

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_timestamp, services::Service},
    document::{
        entities::{METADATA_INGESTED_AT, METADATA_SOURCE_CHECKSUM},
        ports::{DocumentReader, DocumentService, VectorStore},
        value_objects::{IngestDocumentInput, IngestionReport},
    },
    recipe::ports::{ChatClient, ImageClient},
};

impl<CC, IM, VS, DR> DocumentService for Service<CC, IM, VS, DR>
where
    CC: ChatClient,
    IM: ImageClient,
    VS: VectorStore,
    DR: DocumentReader,
{
    #[instrument(skip(self, input), fields(file_name = %input.file_name, size = input.data.len()))]
    async fn ingest_document(
        &self,
        input: IngestDocumentInput,
    ) -> Result<IngestionReport, CoreError> {
        let config = input.reader_config();
        let checksum = hex::encode(Sha256::digest(&input.data));
        let (now, _) = generate_timestamp();
        let ingested_at = now.to_rfc3339();

        // 1. Read one document per page
        let pages = self
            .document_reader
            .read(input.file_name.clone(), input.data, config)
            .await?;
        let pages = pages
            .into_iter()
            .map(|page| {
                page.with_metadata(METADATA_SOURCE_CHECKSUM, checksum.as_str())
                    .with_metadata(METADATA_INGESTED_AT, ingested_at.as_str())
            })
            .collect::<Vec<_>>();
        let page_count = pages.len();

        // 2. Split pages into token chunks
        let splitter = Arc::clone(&self.splitter);
        let chunks = tokio::task::spawn_blocking(move || splitter.apply(&pages))
            .await
            .map_err(|e| {
                error!("Token splitter task failed: {}", e);
                CoreError::InternalServerError
            })??;
        let chunk_count = chunks.len();

        // 3. Store every chunk at once
        self.vector_store.add(chunks).await?;

        info!(
            pages = page_count,
            chunks = chunk_count,
            "Document ingested into vector store"
        );

        Ok(IngestionReport {
            file_name: input.file_name,
            pages: page_count,
            chunks: chunk_count,
        })
    }
}
