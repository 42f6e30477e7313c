use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::ports::DocumentExtractor;
use crate::application::ports::document_extractor::ExtractionOptions;
use crate::application::services::EmbeddingService;
use crate::application::services::text_splitter::RTSplitter;
use crate::config::ChunkingConfig;
use crate::domain::entities::ContentChunk;
use crate::domain::repositories::VectorIndex;
use crate::domain::value_objects::{FileHash, IndexSource};

#[derive(Debug)]
pub enum BuildIndexError {
    ExtractionError(String),
    ConfigError(String),
    NothingToIndex(String),
    EmbeddingError(String),
    IndexError(String),
    IoError(String),
}

impl std::fmt::Display for BuildIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildIndexError::ExtractionError(msg) => write!(f, "Extraction error: {}", msg),
            BuildIndexError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            BuildIndexError::NothingToIndex(path) => {
                write!(f, "No chunks were produced from {}", path)
            }
            BuildIndexError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            BuildIndexError::IndexError(msg) => write!(f, "Index error: {}", msg),
            BuildIndexError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for BuildIndexError {}

#[derive(Debug, Clone)]
pub struct BuildIndexRequest {
    pub pdf_path: PathBuf,
    pub index_dir: PathBuf,
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Clone)]
pub struct BuildStatistics {
    pub document_title: String,
    pub total_pages: usize,
    pub total_chunks: usize,
    pub average_chunk_size: f64,
    pub pages_covered: usize,
    pub sample_chunk: Option<ContentChunk>,
    pub warnings: Vec<String>,
    pub elapsed_ms: u64,
}

impl BuildStatistics {
    fn from_chunks(
        document_title: String,
        total_pages: usize,
        chunks: &[ContentChunk],
        warnings: Vec<String>,
        elapsed_ms: u64,
    ) -> Self {
        let total_chars: usize = chunks.iter().map(|c| c.chunk_size()).sum();
        let mut pages: Vec<u32> = chunks.iter().map(|c| c.page_number()).collect();
        pages.dedup();

        Self {
            document_title,
            total_pages,
            total_chunks: chunks.len(),
            average_chunk_size: if chunks.is_empty() {
                0.0
            } else {
                total_chars as f64 / chunks.len() as f64
            },
            pages_covered: pages.len(),
            sample_chunk: chunks.first().cloned(),
            warnings,
            elapsed_ms,
        }
    }
}

/// PDF → pages → chunks → embeddings → persisted index.
pub struct BuildIndexUseCase {
    document_extractor: Arc<dyn DocumentExtractor>,
    embedding_service: Arc<EmbeddingService>,
    vector_index: Arc<dyn VectorIndex>,
}

impl BuildIndexUseCase {
    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        embedding_service: Arc<EmbeddingService>,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            document_extractor,
            embedding_service,
            vector_index,
        }
    }

    pub async fn execute(
        &self,
        request: BuildIndexRequest,
    ) -> Result<BuildStatistics, BuildIndexError> {
        let start_time = Instant::now();
        let splitter = RTSplitter::new(request.chunking)
            .map_err(|e| BuildIndexError::ConfigError(e.to_string()))?;

        info!("Loading PDF from {}", request.pdf_path.display());
        let document = self
            .document_extractor
            .extract_pages(&request.pdf_path, ExtractionOptions::default())
            .await
            .map_err(|e| BuildIndexError::ExtractionError(e.to_string()))?;

        for warning in &document.warnings {
            warn!("Skipped during extraction: {}", warning);
        }

        let chunks = splitter.chunk_pages(&document.pages);
        if chunks.is_empty() {
            return Err(BuildIndexError::NothingToIndex(
                request.pdf_path.display().to_string(),
            ));
        }
        info!(
            "Split {} pages into {} chunks (size {}, overlap {})",
            document.page_count(),
            chunks.len(),
            splitter.chunk_size(),
            splitter.chunk_overlap()
        );

        info!(
            "Creating embeddings with {}",
            self.embedding_service.model_name()
        );
        let vectors = self
            .embedding_service
            .embed_chunks(&chunks)
            .await
            .map_err(|e| BuildIndexError::EmbeddingError(e.to_string()))?;

        self.vector_index
            .add_batch(&chunks, vectors)
            .await
            .map_err(|e| BuildIndexError::IndexError(e.to_string()))?;

        let sha256 = FileHash::from_file(&request.pdf_path)
            .map_err(|e| BuildIndexError::IoError(e.to_string()))?;
        debug!("Source SHA-256 {}", sha256);
        let source = IndexSource {
            file_name: request
                .pdf_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| request.pdf_path.display().to_string()),
            sha256,
            page_count: document.page_count(),
            info: document.info.clone(),
        };

        self.vector_index
            .persist(&request.index_dir, &source)
            .await
            .map_err(|e| BuildIndexError::IndexError(e.to_string()))?;

        Ok(BuildStatistics::from_chunks(
            document.info.display_title().to_string(),
            document.page_count(),
            &chunks,
            document.warnings,
            start_time.elapsed().as_millis() as u64,
        ))
    }
}
