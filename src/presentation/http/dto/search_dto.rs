use serde::{Deserialize, Serialize};

use crate::application::use_cases::search_content::SearchContentResponse;
use crate::domain::entities::RetrievedChunk;

#[derive(Debug, Deserialize)]
pub struct SearchRequestDto {
    #[serde(default)]
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponseDto {
    pub query: String,
    pub results: Vec<SearchResultDto>,
    pub total_results: usize,
    pub search_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchResultDto {
    pub chunk_id: usize,
    pub page_number: u32,
    pub start_index: usize,
    pub has_section: bool,
    pub similarity_score: f32,
    pub chunk_text: String,
}

impl From<SearchContentResponse> for SearchResponseDto {
    fn from(response: SearchContentResponse) -> Self {
        Self {
            query: response.query,
            results: response.results.into_iter().map(SearchResultDto::from).collect(),
            total_results: response.total_results,
            search_time_ms: response.search_time_ms,
        }
    }
}

impl From<RetrievedChunk> for SearchResultDto {
    fn from(result: RetrievedChunk) -> Self {
        Self {
            chunk_id: result.chunk.chunk_id(),
            page_number: result.chunk.page_number(),
            start_index: result.chunk.start_index(),
            has_section: result.chunk.has_section(),
            similarity_score: result.similarity_score,
            chunk_text: result.chunk.text().to_string(),
        }
    }
}
