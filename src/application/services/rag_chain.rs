use std::sync::Arc;

use tracing::info;

use crate::application::ports::LanguageModel;
use crate::application::ports::language_model::CompletionRequest;
use crate::application::services::SearchService;
use crate::application::services::prompt::PromptTemplate;
use crate::domain::entities::RagAnswer;

#[derive(Debug)]
pub enum RagChainError {
    ValidationError(String),
    RetrievalError(String),
    GenerationError(String),
}

impl std::fmt::Display for RagChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RagChainError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RagChainError::RetrievalError(msg) => write!(f, "Retrieval failed: {}", msg),
            RagChainError::GenerationError(msg) => write!(f, "Answer generation failed: {}", msg),
        }
    }
}

impl std::error::Error for RagChainError {}

#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub top_k: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            temperature: 0.0,
            max_tokens: 2048,
        }
    }
}

/// Retrieve, stuff the prompt, ask the model. One blocking round trip per question.
pub struct RagChain {
    search_service: Arc<SearchService>,
    language_model: Arc<dyn LanguageModel>,
    prompt: PromptTemplate,
    settings: GenerationSettings,
}

impl RagChain {
    pub fn new(
        search_service: Arc<SearchService>,
        language_model: Arc<dyn LanguageModel>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            search_service,
            language_model,
            prompt: PromptTemplate::default(),
            settings,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<RagAnswer, RagChainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagChainError::ValidationError(
                "Question cannot be empty".to_string(),
            ));
        }

        let sources = self
            .search_service
            .search(question, self.settings.top_k)
            .await
            .map_err(|e| RagChainError::RetrievalError(e.to_string()))?;

        let request = CompletionRequest {
            prompt: self.prompt.render(&sources, question),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let answer = self
            .language_model
            .complete(request)
            .await
            .map_err(|e| RagChainError::GenerationError(e.to_string()))?;

        info!(
            "Answered question with {} sources (pages {:?})",
            sources.len(),
            sources
                .iter()
                .map(|s| s.chunk.page_number())
                .collect::<Vec<_>>()
        );

        Ok(RagAnswer {
            question: question.to_string(),
            answer: answer.trim().to_string(),
            sources,
        })
    }
}
