use serde::{Deserialize, Serialize};

use super::ContentChunk;
use super::content_chunk::text_preview;

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub chunk: ContentChunk,
    pub similarity_score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RagAnswer {
    pub question: String,
    pub answer: String,
    pub sources: Vec<RetrievedChunk>,
}

impl RagAnswer {
    pub fn citations(&self) -> Vec<SourceCitation> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, retrieved)| SourceCitation::new(i + 1, retrieved))
            .collect()
    }
}

/// A retrieved chunk as shown under an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub rank: usize,
    pub chunk_id: usize,
    pub page_number: u32,
    pub similarity_score: f32,
    pub text: String,
}

impl SourceCitation {
    pub fn new(rank: usize, retrieved: &RetrievedChunk) -> Self {
        Self {
            rank,
            chunk_id: retrieved.chunk.chunk_id(),
            page_number: retrieved.chunk.page_number(),
            similarity_score: retrieved.similarity_score,
            text: retrieved.chunk.text().to_string(),
        }
    }

    pub fn preview(&self, max_chars: usize) -> String {
        text_preview(&self.text, max_chars)
    }
}
