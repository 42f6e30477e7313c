use std::sync::Arc;

use tracing::debug;

use crate::application::ports::embedding_provider::EmbeddingProvider;
use crate::domain::entities::ContentChunk;

#[derive(Debug)]
pub enum EmbeddingServiceError {
    ProviderError(String),
    ValidationError(String),
}

impl std::fmt::Display for EmbeddingServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingServiceError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            EmbeddingServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for EmbeddingServiceError {}

pub struct EmbeddingService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl EmbeddingService {
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Self {
        Self {
            embedding_provider,
            batch_size: batch_size.max(1),
        }
    }

    /// Embeds every chunk, batch by batch. The result is aligned with `chunks`.
    pub async fn embed_chunks(
        &self,
        chunks: &[ContentChunk],
    ) -> Result<Vec<Vec<f32>>, EmbeddingServiceError> {
        if let Some(empty) = chunks.iter().find(|chunk| chunk.is_empty()) {
            return Err(EmbeddingServiceError::ValidationError(format!(
                "Cannot generate embedding for empty chunk {}",
                empty.chunk_id()
            )));
        }

        let mut vectors = Vec::with_capacity(chunks.len());
        let total_batches = chunks.len().div_ceil(self.batch_size);

        for (batch_number, chunk_batch) in chunks.chunks(self.batch_size).enumerate() {
            let texts: Vec<String> = chunk_batch
                .iter()
                .map(|chunk| chunk.text().to_string())
                .collect();

            let batch_vectors = self
                .embedding_provider
                .embed_documents(texts)
                .await
                .map_err(|e| EmbeddingServiceError::ProviderError(e.to_string()))?;

            if batch_vectors.len() != chunk_batch.len() {
                return Err(EmbeddingServiceError::ProviderError(format!(
                    "Provider returned {} embeddings for {} chunks",
                    batch_vectors.len(),
                    chunk_batch.len()
                )));
            }

            debug!("Embedded batch {}/{}", batch_number + 1, total_batches);
            vectors.extend(batch_vectors);
        }

        Ok(vectors)
    }

    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, EmbeddingServiceError> {
        if query.trim().is_empty() {
            return Err(EmbeddingServiceError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        self.embedding_provider
            .embed_query(query)
            .await
            .map_err(|e| EmbeddingServiceError::ProviderError(e.to_string()))
    }

    pub fn model_name(&self) -> &str {
        self.embedding_provider.model_name()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.embedding_provider.embedding_dimension()
    }
}
