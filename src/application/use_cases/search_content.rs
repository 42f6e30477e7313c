use std::sync::Arc;

use crate::application::services::SearchService;
use crate::domain::entities::RetrievedChunk;

pub const DEFAULT_SEARCH_LIMIT: usize = 4;
pub const MAX_SEARCH_LIMIT: usize = 20;

#[derive(Debug)]
pub enum SearchContentError {
    SearchError(String),
    ValidationError(String),
}

impl std::fmt::Display for SearchContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchContentError::SearchError(msg) => write!(f, "Search error: {}", msg),
            SearchContentError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for SearchContentError {}

#[derive(Debug, Clone)]
pub struct SearchContentRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SearchContentResponse {
    pub query: String,
    pub results: Vec<RetrievedChunk>,
    pub total_results: usize,
    pub search_time_ms: u64,
}

/// Retrieval without generation.
pub struct SearchContentUseCase {
    search_service: Arc<SearchService>,
}

impl SearchContentUseCase {
    pub fn new(search_service: Arc<SearchService>) -> Self {
        Self { search_service }
    }

    pub async fn execute(
        &self,
        request: SearchContentRequest,
    ) -> Result<SearchContentResponse, SearchContentError> {
        let start_time = std::time::Instant::now();

        if request.query.trim().is_empty() {
            return Err(SearchContentError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let limit = request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(SearchContentError::ValidationError(format!(
                "Limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        let results = self
            .search_service
            .search(&request.query, limit)
            .await
            .map_err(|e| SearchContentError::SearchError(e.to_string()))?;

        Ok(SearchContentResponse {
            query: request.query,
            total_results: results.len(),
            results,
            search_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
