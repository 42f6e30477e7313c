use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::application::services::RagChain;
use crate::application::services::rag_chain::RagChainError;
use crate::domain::entities::{Conversation, ConversationTurn};
use crate::domain::repositories::{ConversationRepository, ConversationRepositoryError};

#[derive(Debug)]
pub enum ChatSessionError {
    EmptyQuestion,
    SessionNotFound(Uuid),
    PipelineError(String),
}

impl std::fmt::Display for ChatSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatSessionError::EmptyQuestion => write!(f, "Question cannot be empty"),
            ChatSessionError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            ChatSessionError::PipelineError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ChatSessionError {}

impl From<ConversationRepositoryError> for ChatSessionError {
    fn from(e: ConversationRepositoryError) -> Self {
        match e {
            ConversationRepositoryError::NotFound(id) => ChatSessionError::SessionNotFound(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub turn: ConversationTurn,
}

pub struct ChatSessionUseCase {
    rag_chain: Arc<RagChain>,
    conversations: Arc<dyn ConversationRepository>,
}

impl ChatSessionUseCase {
    pub fn new(rag_chain: Arc<RagChain>, conversations: Arc<dyn ConversationRepository>) -> Self {
        Self {
            rag_chain,
            conversations,
        }
    }

    /// Records the question, answers it and records the answer.
    /// When answering fails the question stays in the history.
    pub async fn send_message(
        &self,
        session_id: Option<Uuid>,
        question: &str,
    ) -> Result<ChatReply, ChatSessionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatSessionError::EmptyQuestion);
        }

        let session_id = self.conversations.get_or_create(session_id).await;
        self.conversations
            .append(session_id, ConversationTurn::user(question.to_string()))
            .await?;

        let answer = match self.rag_chain.ask(question).await {
            Ok(answer) => answer,
            Err(RagChainError::ValidationError(_)) => return Err(ChatSessionError::EmptyQuestion),
            Err(e) => {
                error!("Failed to answer question in session {}: {}", session_id, e);
                return Err(ChatSessionError::PipelineError(e.to_string()));
            }
        };

        let turn = ConversationTurn::assistant(answer.answer.clone(), answer.citations());
        self.conversations.append(session_id, turn.clone()).await?;

        Ok(ChatReply { session_id, turn })
    }

    pub async fn history(&self, session_id: Uuid) -> Result<Conversation, ChatSessionError> {
        self.conversations
            .find(session_id)
            .await
            .ok_or(ChatSessionError::SessionNotFound(session_id))
    }

    /// Drops the session and its history.
    pub async fn end_session(&self, session_id: Uuid) -> Result<(), ChatSessionError> {
        Ok(self.conversations.remove(session_id).await?)
    }

    pub async fn session_count(&self) -> usize {
        self.conversations.count().await
    }
}
