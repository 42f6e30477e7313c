use std::sync::Arc;

use tracing::debug;

use crate::application::services::EmbeddingService;
use crate::domain::entities::RetrievedChunk;
use crate::domain::repositories::{VectorIndex, VectorIndexError};

#[derive(Debug)]
pub enum SearchServiceError {
    ValidationError(String),
    EmbeddingError(String),
    IndexError(String),
}

impl std::fmt::Display for SearchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchServiceError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            SearchServiceError::IndexError(msg) => write!(f, "Index error: {}", msg),
        }
    }
}

impl std::error::Error for SearchServiceError {}

pub struct SearchService {
    embedding_service: Arc<EmbeddingService>,
    vector_index: Arc<dyn VectorIndex>,
}

impl SearchService {
    pub fn new(embedding_service: Arc<EmbeddingService>, vector_index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedding_service,
            vector_index,
        }
    }

    /// Embeds `query` and returns the `limit` most similar chunks, best first.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, SearchServiceError> {
        if query.trim().is_empty() {
            return Err(SearchServiceError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let query_vector = self
            .embedding_service
            .embed_query(query)
            .await
            .map_err(|e| SearchServiceError::EmbeddingError(e.to_string()))?;

        let results = self
            .vector_index
            .similarity_search(&query_vector, limit)
            .await
            .map_err(|e| SearchServiceError::IndexError(e.to_string()))?;

        debug!("Retrieved {} chunks for query", results.len());
        Ok(results)
    }

    /// Errors when the embedding model is known to produce vectors of a
    /// different size than the ones stored in the index.
    pub async fn ensure_dimensions_match(&self) -> Result<(), SearchServiceError> {
        let model = self.embedding_service.dimension();
        let index = self.vector_index.dimension().await;
        match (model, index) {
            (Some(actual), Some(expected)) if actual != expected => {
                Err(SearchServiceError::IndexError(
                    VectorIndexError::DimensionMismatch { expected, actual }.to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}
