pub mod conversation_repository;
pub mod vector_index;

pub use conversation_repository::{ConversationRepository, ConversationRepositoryError};
pub use vector_index::{VectorIndex, VectorIndexError};
