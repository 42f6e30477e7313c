use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        ports::{DocumentExtractor, EmbeddingProvider, LanguageModel},
        services::{EmbeddingService, GenerationSettings, RagChain, SearchService},
        use_cases::{
            AskQuestionUseCase, BuildIndexUseCase, ChatSessionUseCase, SearchContentUseCase,
        },
    },
    config::{AppConfig, EmbeddingBackend},
    domain::repositories::{ConversationRepository, VectorIndex},
    infrastructure::{
        external_services::{
            AnthropicClient, InferenceEmbeddingProvider, document_extractors::PdfExtractor,
        },
        sessions::InMemoryConversationRepository,
        vector_store::FlatIndex,
    },
    presentation::http::handlers::{ChatHandler, InfoHandler, SearchHandler},
};

#[derive(Debug)]
pub enum ContainerError {
    Embedding(String),
    Index(String),
    LanguageModel(String),
}

impl std::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerError::Embedding(msg) => write!(f, "Failed to set up embeddings: {}", msg),
            ContainerError::Index(msg) => write!(f, "{}", msg),
            ContainerError::LanguageModel(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ContainerError {}

pub async fn create_embedding_provider(
    config: &AppConfig,
) -> Result<Arc<dyn EmbeddingProvider>, ContainerError> {
    match config.embedding.backend {
        #[cfg(feature = "local-embeddings")]
        EmbeddingBackend::Local => {
            use crate::infrastructure::external_services::LocalEmbeddingProvider;
            let provider = LocalEmbeddingProvider::load(&config.embedding)
                .await
                .map_err(|e| ContainerError::Embedding(e.to_string()))?;
            Ok(Arc::new(provider))
        }
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingBackend::Local => Err(ContainerError::Embedding(
            "built without the local-embeddings feature; set EMBEDDING_BACKEND=remote".to_string(),
        )),
        EmbeddingBackend::Remote => {
            info!(
                "Using remote embedding service at {}",
                config.embedding.service_url
            );
            let provider = InferenceEmbeddingProvider::from_config(&config.embedding)
                .map_err(|e| ContainerError::Embedding(e.to_string()))?;
            Ok(Arc::new(provider))
        }
    }
}

/// Wiring for the `build` command: a fresh, empty index.
pub async fn build_index_use_case(config: &AppConfig) -> Result<BuildIndexUseCase, ContainerError> {
    let embedding_provider = create_embedding_provider(config).await?;
    let document_extractor: Arc<dyn DocumentExtractor> = Arc::new(PdfExtractor::new());
    let embedding_service = Arc::new(EmbeddingService::new(
        embedding_provider,
        config.embedding.batch_size,
    ));
    let vector_index: Arc<dyn VectorIndex> =
        Arc::new(FlatIndex::new(&config.embedding.model_name));

    Ok(BuildIndexUseCase::new(
        document_extractor,
        embedding_service,
        vector_index,
    ))
}

/// Retrieval only: loads the persisted index and the embedding model that built it.
pub struct RetrievalContainer {
    pub vector_index: Arc<FlatIndex>,
    pub search_service: Arc<SearchService>,
    pub search_content_use_case: Arc<SearchContentUseCase>,
}

impl RetrievalContainer {
    pub async fn new(config: &AppConfig) -> Result<Self, ContainerError> {
        let vector_index = Arc::new(
            FlatIndex::load(&config.index_dir)
                .await
                .map_err(|e| ContainerError::Index(e.to_string()))?,
        );
        vector_index
            .ensure_model(&config.embedding.model_name)
            .map_err(|e| ContainerError::Index(e.to_string()))?;

        let embedding_provider = create_embedding_provider(config).await?;
        let embedding_service = Arc::new(EmbeddingService::new(
            embedding_provider,
            config.embedding.batch_size,
        ));
        let search_service = Arc::new(SearchService::new(embedding_service, vector_index.clone()));
        search_service
            .ensure_dimensions_match()
            .await
            .map_err(|e| ContainerError::Index(e.to_string()))?;
        let search_content_use_case = Arc::new(SearchContentUseCase::new(search_service.clone()));

        Ok(Self {
            vector_index,
            search_service,
            search_content_use_case,
        })
    }
}

pub struct AppContainer {
    // Use Cases
    pub ask_question_use_case: Arc<AskQuestionUseCase>,
    pub chat_session_use_case: Arc<ChatSessionUseCase>,

    // HTTP Handlers
    pub chat_handler: Arc<ChatHandler>,
    pub search_handler: Arc<SearchHandler>,
    pub info_handler: Arc<InfoHandler>,
}

impl AppContainer {
    /// Fails fast when the API key is missing, before any model is loaded.
    pub async fn new(config: AppConfig) -> Result<Self, ContainerError> {
        let language_model: Arc<dyn LanguageModel> = Arc::new(
            AnthropicClient::from_config(&config.llm)
                .map_err(|e| ContainerError::LanguageModel(e.to_string()))?,
        );

        let retrieval = RetrievalContainer::new(&config).await?;
        info!("Connected to language model {}", language_model.model_name());

        let conversation_repository: Arc<dyn ConversationRepository> =
            Arc::new(InMemoryConversationRepository::new(&config.sessions));

        let rag_chain = Arc::new(RagChain::new(
            retrieval.search_service.clone(),
            language_model.clone(),
            GenerationSettings {
                top_k: config.top_k,
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            },
        ));

        let ask_question_use_case = Arc::new(AskQuestionUseCase::new(rag_chain.clone()));
        let chat_session_use_case = Arc::new(ChatSessionUseCase::new(
            rag_chain,
            conversation_repository,
        ));

        let chat_handler = Arc::new(ChatHandler::new(chat_session_use_case.clone()));
        let search_handler = Arc::new(SearchHandler::new(retrieval.search_content_use_case));
        let info_handler = Arc::new(InfoHandler::new(
            retrieval.vector_index,
            chat_session_use_case.clone(),
            language_model.model_name().to_string(),
        ));

        Ok(Self {
            ask_question_use_case,
            chat_session_use_case,
            chat_handler,
            search_handler,
            info_handler,
        })
    }
}
