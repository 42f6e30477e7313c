use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Conversation, ConversationTurn};

#[derive(Debug)]
pub enum ConversationRepositoryError {
    NotFound(Uuid),
}

impl std::fmt::Display for ConversationRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationRepositoryError::NotFound(id) => write!(f, "Session not found: {}", id),
        }
    }
}

impl std::error::Error for ConversationRepositoryError {}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Returns the session id, creating the session when `id` is absent or unknown.
    /// Known sessions are marked active.
    async fn get_or_create(&self, id: Option<Uuid>) -> Uuid;

    async fn append(
        &self,
        id: Uuid,
        turn: ConversationTurn,
    ) -> Result<(), ConversationRepositoryError>;

    async fn find(&self, id: Uuid) -> Option<Conversation>;

    async fn remove(&self, id: Uuid) -> Result<(), ConversationRepositoryError>;

    async fn count(&self) -> usize;
}
