use tiktoken_rs::{CoreBPE, Rank, cl100k_base};

use crate::domain::{common::entities::app_errors::CoreError, document::entities::Document};

pub const DEFAULT_CHUNK_SIZE: usize = 800;
pub const MIN_CHUNK_SIZE_CHARS: usize = 350;
pub const MIN_CHUNK_LENGTH_TO_EMBED: usize = 5;
pub const MAX_NUM_CHUNKS: usize = 10_000;

const PUNCTUATION: [char; 4] = ['.', '?', '!', '\n'];

/// Splits text into chunks of at most `chunk_size` cl100k tokens.
///
/// A chunk is cut back to its last sentence punctuation when that keeps more
/// than `min_chunk_size_chars` characters. Chunks of `min_chunk_length_to_embed`
/// characters or fewer are dropped.
pub struct TokenTextSplitter {
    encoding: CoreBPE,
    chunk_size: usize,
    min_chunk_size_chars: usize,
    min_chunk_length_to_embed: usize,
    max_num_chunks: usize,
    keep_separator: bool,
}

impl TokenTextSplitter {
    pub fn new() -> Result<Self, CoreError> {
        let encoding = cl100k_base().map_err(|e| {
            CoreError::Configuration(format!("Failed to load cl100k_base encoding: {}", e))
        })?;

        Ok(Self {
            encoding,
            chunk_size: DEFAULT_CHUNK_SIZE,
            min_chunk_size_chars: MIN_CHUNK_SIZE_CHARS,
            min_chunk_length_to_embed: MIN_CHUNK_LENGTH_TO_EMBED,
            max_num_chunks: MAX_NUM_CHUNKS,
            keep_separator: true,
        })
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_min_chunk_size_chars(mut self, min_chunk_size_chars: usize) -> Self {
        self.min_chunk_size_chars = min_chunk_size_chars;
        self
    }

    /// Splits every document; chunks keep the metadata of their source document.
    pub fn apply(&self, documents: &[Document]) -> Result<Vec<Document>, CoreError> {
        let mut chunks = Vec::new();
        for document in documents {
            for text in self.split_text(&document.content)? {
                chunks.push(document.derive(text));
            }
        }
        Ok(chunks)
    }

    pub fn split_text(&self, text: &str) -> Result<Vec<String>, CoreError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut tokens = self.encoding.encode_ordinary(text);
        let mut chunks = Vec::new();
        let mut num_chunks = 0;

        while !tokens.is_empty() && num_chunks < self.max_num_chunks {
            let (mut chunk_text, taken) = self.decode_prefix(&tokens);

            if chunk_text.trim().is_empty() {
                tokens.drain(..taken);
                continue;
            }

            let mut truncated = false;
            if let Some(position) = chunk_text.rfind(PUNCTUATION) {
                if position + 1 < chunk_text.len()
                    && chunk_text[..position].chars().count() > self.min_chunk_size_chars
                {
                    chunk_text.truncate(position + 1);
                    truncated = true;
                }
            }

            let to_append = if self.keep_separator {
                chunk_text.trim().to_string()
            } else {
                chunk_text.replace('\n', " ").trim().to_string()
            };
            if to_append.chars().count() > self.min_chunk_length_to_embed {
                chunks.push(to_append);
            }

            let consumed = if truncated {
                self.encoding
                    .encode_ordinary(&chunk_text)
                    .len()
                    .clamp(1, taken)
            } else {
                taken
            };
            tokens.drain(..consumed);
            num_chunks += 1;
        }

        if !tokens.is_empty() {
            let remaining = self
                .decode_lossy(&tokens)
                .replace('\n', " ")
                .trim()
                .to_string();
            if remaining.chars().count() > self.min_chunk_length_to_embed {
                chunks.push(remaining);
            }
        }

        Ok(chunks)
    }

    /// Decodes up to `chunk_size` leading tokens. A multi-byte character cut
    /// at the boundary is left for the next chunk; a leading token that never
    /// decodes on its own is skipped as an empty chunk.
    fn decode_prefix(&self, tokens: &[Rank]) -> (String, usize) {
        let end = self.chunk_size.min(tokens.len());
        let lowest = end.saturating_sub(3).max(1);

        (lowest..=end)
            .rev()
            .find_map(|taken| {
                self.encoding
                    .decode(tokens[..taken].to_vec())
                    .ok()
                    .map(|text| (text, taken))
            })
            .unwrap_or_else(|| {
                tracing::debug!("Skipping undecodable token");
                (String::new(), 1)
            })
    }

    fn decode_lossy(&self, tokens: &[Rank]) -> String {
        (1..=tokens.len())
            .rev()
            .find_map(|end| self.encoding.decode(tokens[..end].to_vec()).ok())
            .unwrap_or_default()
    }
}
