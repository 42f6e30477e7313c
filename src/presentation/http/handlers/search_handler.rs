use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::search_content::SearchContentError;
use crate::application::use_cases::{SearchContentRequest, SearchContentUseCase};
use crate::presentation::http::dto::{ApiResponse, SearchRequestDto, SearchResponseDto};

pub struct SearchHandler {
    search_use_case: Arc<SearchContentUseCase>,
}

impl SearchHandler {
    pub fn new(search_use_case: Arc<SearchContentUseCase>) -> Self {
        Self { search_use_case }
    }

    pub async fn search_content(
        State(handler): State<Arc<SearchHandler>>,
        Query(search_params): Query<SearchRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        if search_params.query.trim().is_empty() {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("EMPTY_QUERY", "Query cannot be empty")),
            ));
        }

        let request = SearchContentRequest {
            query: search_params.query,
            limit: search_params.limit,
        };

        match handler.search_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::<SearchResponseDto>::success(
                    SearchResponseDto::from(response),
                )),
            )),
            Err(SearchContentError::ValidationError(msg)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure("INVALID_LIMIT", msg)),
            )),
            Err(e) => Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ApiResponse::failure("SEARCH_FAILED", "Search failed")
                        .with_details(e.to_string()),
                ),
            )),
        }
    }
}
