use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::{ContentChunk, RetrievedChunk};
use crate::domain::value_objects::IndexSource;

#[derive(Debug)]
pub enum VectorIndexError {
    IndexNotFound(String),
    DimensionMismatch { expected: usize, actual: usize },
    DuplicateEntry(usize),
    LengthMismatch { chunks: usize, vectors: usize },
    ModelMismatch { index_model: String, configured: String },
    Corrupted(String),
    IoError(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::IndexNotFound(path) => write!(
                f,
                "Vector index not found at {} (run the `build` command first)",
                path
            ),
            VectorIndexError::DimensionMismatch { expected, actual } => write!(
                f,
                "Vector dimension mismatch: index has {}, got {}",
                expected, actual
            ),
            VectorIndexError::DuplicateEntry(id) => {
                write!(f, "Chunk {} is already present in the index", id)
            }
            VectorIndexError::LengthMismatch { chunks, vectors } => write!(
                f,
                "Got {} vectors for {} chunks",
                vectors, chunks
            ),
            VectorIndexError::ModelMismatch {
                index_model,
                configured,
            } => write!(
                f,
                "Index was built with embedding model '{}' but '{}' is configured",
                index_model, configured
            ),
            VectorIndexError::Corrupted(msg) => write!(f, "Corrupted index: {}", msg),
            VectorIndexError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Adds one entry per chunk; `vectors[i]` is the embedding of `chunks[i]`.
    async fn add_batch(
        &self,
        chunks: &[ContentChunk],
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), VectorIndexError>;

    /// Top `limit` chunks by similarity, best first.
    async fn similarity_search(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorIndexError>;

    async fn count(&self) -> Result<usize, VectorIndexError>;

    async fn dimension(&self) -> Option<usize>;

    fn model_name(&self) -> &str;

    /// Provenance of the document the index was built from; `None` until persisted or loaded.
    async fn source(&self) -> Option<IndexSource>;

    async fn persist(&self, dir: &Path, source: &IndexSource) -> Result<(), VectorIndexError>;
}
