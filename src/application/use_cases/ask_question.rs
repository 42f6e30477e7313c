use std::sync::Arc;

use crate::application::services::RagChain;
use crate::application::services::rag_chain::RagChainError;
use crate::domain::entities::RagAnswer;

#[derive(Debug)]
pub enum AskQuestionError {
    EmptyQuestion,
    PipelineError(String),
}

impl std::fmt::Display for AskQuestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskQuestionError::EmptyQuestion => write!(f, "Question cannot be empty"),
            AskQuestionError::PipelineError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AskQuestionError {}

impl From<RagChainError> for AskQuestionError {
    fn from(e: RagChainError) -> Self {
        match e {
            RagChainError::ValidationError(_) => AskQuestionError::EmptyQuestion,
            other => AskQuestionError::PipelineError(other.to_string()),
        }
    }
}

/// Single-shot question answering, no session state.
pub struct AskQuestionUseCase {
    rag_chain: Arc<RagChain>,
}

impl AskQuestionUseCase {
    pub fn new(rag_chain: Arc<RagChain>) -> Self {
        Self { rag_chain }
    }

    pub async fn execute(&self, question: &str) -> Result<RagAnswer, AskQuestionError> {
        Ok(self.rag_chain.ask(question).await?)
    }
}
