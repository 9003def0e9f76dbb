use bytes::Bytes;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};
use serde_json::{Map, json};
use tracing::{debug, error, info};

use crate::domain::{
    common::entities::app_errors::CoreError,
    document::{
        entities::{Document, METADATA_FILE_NAME, METADATA_PAGE_NUMBER},
        ports::DocumentReader,
        value_objects::PdfReaderConfig,
    },
};

/// Reads PDFs page by page with `pdf-extract`, dropping header and footer
/// bands given by [`PdfReaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct PdfExtractDocumentReader;

impl PdfExtractDocumentReader {
    pub fn new() -> Self {
        Self
    }
}

/// Page text as (1-based page number, text).
fn extract_pages(data: &[u8], config: PdfReaderConfig) -> Result<Vec<(u32, String)>, CoreError> {
    let mut document = lopdf::Document::load_mem(data).map_err(|e| {
        error!("Failed to parse PDF: {}", e);
        CoreError::InvalidDocument(format!("Failed to parse PDF: {}", e))
    })?;
    if document.is_encrypted() {
        document.decrypt("").map_err(|e| {
            error!("Failed to decrypt PDF: {}", e);
            CoreError::InvalidDocument("PDF is protected by a password".to_string())
        })?;
    }

    let mut output = MarginCroppingOutput::new(config);
    pdf_extract::output_doc(&document, &mut output).map_err(|e| {
        error!("Failed to extract PDF text: {}", e);
        CoreError::InvalidDocument(format!("Failed to extract PDF text: {}", e))
    })?;

    Ok(output.into_pages())
}

impl DocumentReader for PdfExtractDocumentReader {
    async fn read(
        &self,
        file_name: String,
        data: Bytes,
        config: PdfReaderConfig,
    ) -> Result<Vec<Document>, CoreError> {
        let pages = tokio::task::spawn_blocking(move || extract_pages(&data, config))
            .await
            .map_err(|e| {
                error!("PDF extraction task failed: {}", e);
                CoreError::InvalidDocument("PDF could not be read".to_string())
            })??;

        let documents = pages
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(page_number, text)| {
                let mut metadata = Map::new();
                metadata.insert(METADATA_FILE_NAME.to_string(), json!(file_name));
                metadata.insert(METADATA_PAGE_NUMBER.to_string(), json!(page_number));
                Document::new(text, metadata)
            })
            .collect::<Vec<_>>();

        info!(file_name = %file_name, pages = documents.len(), "PDF read");
        Ok(documents)
    }
}

/// Collects the text of each page, keeping only glyphs whose baseline lies
/// between the configured margins.
struct MarginCroppingOutput {
    config: PdfReaderConfig,
    pages: Vec<(u32, String)>,
    current: Option<PageText>,
}

impl MarginCroppingOutput {
    fn new(config: PdfReaderConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: None,
        }
    }

    fn into_pages(mut self) -> Vec<(u32, String)> {
        self.finish_page();
        self.pages
    }

    fn finish_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push((page.number, page.text));
        }
    }
}

impl OutputDev for MarginCroppingOutput {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        self.finish_page();
        self.current = Some(PageText::new(
            page_num,
            media_box.lly + f64::from(self.config.page_bottom_margin),
            media_box.ury - f64::from(self.config.page_top_margin),
        ));
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        self.finish_page();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        if let Some(page) = self.current.as_mut() {
            let size_x = font_size * (trm.m11 + trm.m21);
            let size_y = font_size * (trm.m12 + trm.m22);
            let size = (size_x * size_y).abs().sqrt();
            page.push_glyph(trm.m31, trm.m32, width * size, size, char);
        }
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Text of one page, rebuilt from positioned glyphs.
#[derive(Debug)]
struct PageText {
    number: u32,
    min_y: f64,
    max_y: f64,
    text: String,
    last_end: f64,
    last_y: Option<f64>,
}

impl PageText {
    fn new(number: u32, min_y: f64, max_y: f64) -> Self {
        Self {
            number,
            min_y,
            max_y,
            text: String::new(),
            last_end: f64::MAX,
            last_y: None,
        }
    }

    /// `x`/`y` is the glyph origin in PDF user space, `advance` its width.
    fn push_glyph(&mut self, x: f64, y: f64, advance: f64, size: f64, glyph: &str) {
        if y < self.min_y || y > self.max_y {
            debug!(page = self.number, y, "Glyph dropped by page margin");
            return;
        }

        if let Some(last_y) = self.last_y {
            let dy = (y - last_y).abs();
            if dy > size * 1.5 || (x < self.last_end && dy > size * 0.5) {
                self.text.push('\n');
            } else if x > self.last_end + size * 0.1 && !self.text.ends_with(' ') {
                self.text.push(' ');
            }
        }

        self.text.push_str(glyph);
        self.last_end = x + advance;
        self.last_y = Some(y);
    }
}
