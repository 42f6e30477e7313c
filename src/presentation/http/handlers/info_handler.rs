use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::ChatSessionUseCase;
use crate::domain::repositories::VectorIndex;
use crate::domain::value_objects::SOURCE_TITLE;
use crate::presentation::EXAMPLE_QUESTIONS;
use crate::presentation::http::dto::{ApiResponse, ExamplesDto, IndexInfoDto};

pub struct InfoHandler {
    vector_index: Arc<dyn VectorIndex>,
    chat_use_case: Arc<ChatSessionUseCase>,
    llm_model: String,
}

impl InfoHandler {
    pub fn new(
        vector_index: Arc<dyn VectorIndex>,
        chat_use_case: Arc<ChatSessionUseCase>,
        llm_model: String,
    ) -> Self {
        Self {
            vector_index,
            chat_use_case,
            llm_model,
        }
    }

    pub async fn index_info(
        State(handler): State<Arc<InfoHandler>>,
    ) -> Result<impl IntoResponse, StatusCode> {
        let vector_count = handler
            .vector_index
            .count()
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        let document_title = handler
            .vector_index
            .source()
            .await
            .map(|source| source.info.display_title().to_string())
            .unwrap_or_else(|| SOURCE_TITLE.to_string());

        let info = IndexInfoDto {
            document_title,
            vector_count,
            dimension: handler.vector_index.dimension().await,
            embedding_model: handler.vector_index.model_name().to_string(),
            llm_model: handler.llm_model.clone(),
            active_sessions: handler.chat_use_case.session_count().await,
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok((StatusCode::OK, Json(ApiResponse::success(info))))
    }

    pub async fn examples() -> impl IntoResponse {
        let examples = ExamplesDto {
            questions: EXAMPLE_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        };
        (StatusCode::OK, Json(ApiResponse::success(examples)))
    }
}
