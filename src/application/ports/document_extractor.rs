use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::DocumentPage;
use crate::domain::value_objects::DocumentInfo;

#[derive(Debug)]
pub enum DocumentExtractionError {
    FileNotFound(String),
    UnsupportedFormat(String),
    CorruptedFile(String),
    ExtractionFailed(String),
    NoText(String),
}

impl std::fmt::Display for DocumentExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentExtractionError::FileNotFound(path) => write!(f, "File not found: {}", path),
            DocumentExtractionError::UnsupportedFormat(format) => {
                write!(f, "Unsupported format: {}", format)
            }
            DocumentExtractionError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            DocumentExtractionError::ExtractionFailed(msg) => {
                write!(f, "Extraction failed: {}", msg)
            }
            DocumentExtractionError::NoText(path) => write!(
                f,
                "No text could be extracted from {}. It might be an image-based PDF that requires OCR.",
                path
            ),
        }
    }
}

impl std::error::Error for DocumentExtractionError {}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub pages: Vec<DocumentPage>,
    pub info: DocumentInfo,
    /// Per-page failures that did not abort extraction.
    pub warnings: Vec<String>,
}

impl ExtractedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionOptions {
    /// Tried when the PDF is encrypted. Empty by default.
    pub password: String,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_pages(
        &self,
        file_path: &Path,
        options: ExtractionOptions,
    ) -> Result<ExtractedDocument, DocumentExtractionError>;

    fn can_extract(&self, file_path: &Path) -> bool;
}
