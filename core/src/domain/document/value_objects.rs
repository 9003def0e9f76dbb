use bytes::Bytes;

/// Page bands to exclude before extracting text, in PDF points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PdfReaderConfig {
    pub page_top_margin: u32,
    pub page_bottom_margin: u32,
}

#[derive(Debug, Clone)]
pub struct IngestDocumentInput {
    pub file_name: String,
    pub data: Bytes,
    pub page_top_margin: u32,
    pub page_bottom_margin: u32,
}

impl IngestDocumentInput {
    pub fn reader_config(&self) -> PdfReaderConfig {
        PdfReaderConfig {
            page_top_margin: self.page_top_margin,
            page_bottom_margin: self.page_bottom_margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub file_name: String,
    pub pages: usize,
    pub chunks: usize,
}

pub const DEFAULT_TOP_K: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    /// Minimum cosine similarity, between 0.0 and 1.0. 0.0 accepts everything.
    pub similarity_threshold: f64,
}

impl SearchRequest {
    pub fn new(query: String) -> Self {
        Self {
            query,
            top_k: DEFAULT_TOP_K,
            similarity_threshold: 0.0,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, similarity_threshold: f64) -> Self {
        self.similarity_threshold = similarity_threshold;
        self
    }
}
