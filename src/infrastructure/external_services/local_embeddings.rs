use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, normalize,
};
use crate::config::EmbeddingConfig;

/// Maps a configured model name onto a fastembed model and its output dimension.
pub fn resolve_model(name: &str) -> Result<(EmbeddingModel, usize), EmbeddingProviderError> {
    match name.trim().to_lowercase().as_str() {
        "all-minilm-l6-v2" | "sentence-transformers/all-minilm-l6-v2" => {
            Ok((EmbeddingModel::AllMiniLML6V2, 384))
        }
        "bge-small-en-v1.5" | "baai/bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        other => Err(EmbeddingProviderError::ModelError(format!(
            "unsupported local embedding model '{}'",
            other
        ))),
    }
}

/// Sentence-transformer embeddings computed on the CPU with ONNX Runtime.
pub struct LocalEmbeddingProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
    batch_size: usize,
}

impl LocalEmbeddingProvider {
    /// Loads the model, downloading it into the cache directory on first use.
    pub async fn load(config: &EmbeddingConfig) -> Result<Self, EmbeddingProviderError> {
        let (model, dimension) = resolve_model(&config.model_name)?;
        let cache_dir = config
            .cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".fastembed_cache"));

        info!(
            "Loading embedding model {} (cache: {})",
            config.model_name,
            cache_dir.display()
        );

        let embedding = tokio::task::spawn_blocking(move || {
            TextEmbedding::try_new(
                InitOptions::new(model)
                    .with_cache_dir(cache_dir)
                    .with_show_download_progress(true),
            )
        })
        .await
        .map_err(|e| EmbeddingProviderError::ModelError(e.to_string()))?
        .map_err(|e| EmbeddingProviderError::ModelError(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: config.model_name.clone(),
            dimension,
            batch_size: config.batch_size.max(1),
        })
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let model = Arc::clone(&self.model);
        let batch_size = self.batch_size;

        let mut embeddings = tokio::task::spawn_blocking(move || {
            let model = model
                .lock()
                .map_err(|_| EmbeddingProviderError::ModelError("model lock poisoned".to_string()))?;
            model
                .embed(texts, Some(batch_size))
                .map_err(|e| EmbeddingProviderError::ModelError(e.to_string()))
        })
        .await
        .map_err(|e| EmbeddingProviderError::ModelError(e.to_string()))??;

        embeddings.iter_mut().for_each(|v| normalize(v));
        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed_documents(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.run(texts).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        self.run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ModelError("no embedding produced".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embedding_dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}
