pub mod embedding_service;
pub mod prompt;
pub mod rag_chain;
pub mod search_service;
pub mod text_splitter;

pub use embedding_service::EmbeddingService;
pub use rag_chain::{GenerationSettings, RagChain};
pub use search_service::SearchService;
