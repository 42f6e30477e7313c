pub mod content_chunk;
pub mod conversation;
pub mod document_page;
pub mod rag_answer;

pub use content_chunk::{ChunkPreview, ContentChunk};
pub use conversation::{Conversation, ConversationTurn, Role};
pub use document_page::DocumentPage;
pub use rag_answer::{RagAnswer, RetrievedChunk, SourceCitation};
