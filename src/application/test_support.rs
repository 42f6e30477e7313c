//! Deterministic in-process stand-ins for the embedding model and the LLM.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, normalize,
};
use crate::application::ports::language_model::{
    CompletionRequest, LanguageModel, LanguageModelError,
};

/// Bag-of-words embedder: every lowercase token is hashed into one of `dimension` buckets.
pub struct HashingEmbeddingProvider {
    dimension: usize,
    calls: AtomicUsize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hash: u64 = 0xcbf29ce484222325;
            for byte in token.to_lowercase().bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            vector[(hash % self.dimension as u64) as usize] += 1.0;
        }
        normalize(&mut vector);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed_documents(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        Ok(self.embed(text))
    }

    fn model_name(&self) -> &str {
        "hashing-test-model"
    }

    fn embedding_dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

enum Script {
    Answer(String),
    Fail,
    Hang,
}

/// Returns a canned answer (or an error) and records every prompt it receives.
pub struct ScriptedLanguageModel {
    script: Script,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLanguageModel {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::with_script(Script::Answer(answer.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    /// Never completes.
    pub fn hanging() -> Self {
        Self::with_script(Script::Hang)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        self.prompts.lock().unwrap().push(request.prompt);
        match &self.script {
            Script::Answer(answer) => Ok(answer.clone()),
            Script::Fail => Err(LanguageModelError::NetworkError(
                "connection refused".to_string(),
            )),
            Script::Hang => std::future::pending().await,
        }
    }

    fn model_name(&self) -> &str {
        "scripted-test-model"
    }
}

/// Chat pipeline over a two-chunk index, answering with `model`.
pub async fn scripted_chat(
    model: ScriptedLanguageModel,
) -> crate::application::use_cases::ChatSessionUseCase {
    use std::sync::Arc;

    use crate::application::services::{
        EmbeddingService, GenerationSettings, RagChain, SearchService,
    };
    use crate::application::use_cases::ChatSessionUseCase;
    use crate::domain::entities::ContentChunk;
    use crate::domain::repositories::VectorIndex;
    use crate::infrastructure::sessions::InMemoryConversationRepository;
    use crate::infrastructure::vector_store::FlatIndex;

    let embedding_service = Arc::new(EmbeddingService::new(
        Arc::new(HashingEmbeddingProvider::new(32)),
        8,
    ));
    let chunks = vec![
        ContentChunk::new(0, 17, 0, "HSWA".into(), false, "17 Meaning of PCBU".into()),
        ContentChunk::new(1, 19, 0, "HSWA".into(), false, "19 Meaning of worker".into()),
    ];
    let vectors = embedding_service.embed_chunks(&chunks).await.unwrap();
    let index = FlatIndex::new("hashing-test-model");
    index.add_batch(&chunks, vectors).await.unwrap();

    let search = Arc::new(SearchService::new(embedding_service, Arc::new(index)));
    let chain = Arc::new(RagChain::new(
        search,
        Arc::new(model),
        GenerationSettings::default(),
    ));
    ChatSessionUseCase::new(chain, Arc::new(InMemoryConversationRepository::default()))
}
