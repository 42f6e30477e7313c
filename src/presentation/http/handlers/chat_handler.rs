use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::ChatSessionUseCase;
use crate::application::use_cases::chat_session::ChatSessionError;
use crate::presentation::http::dto::{
    ApiResponse, ChatRequestDto, ChatResponseDto, ConversationDto, SessionClearedDto,
};

pub struct ChatHandler {
    chat_use_case: Arc<ChatSessionUseCase>,
}

fn error_response<T>(e: ChatSessionError) -> (StatusCode, Json<ApiResponse<T>>) {
    let (status, code) = match &e {
        ChatSessionError::EmptyQuestion => (StatusCode::BAD_REQUEST, "EMPTY_QUESTION"),
        ChatSessionError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
        ChatSessionError::PipelineError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_FAILED"),
    };
    (status, Json(ApiResponse::failure(code, e.to_string())))
}

impl ChatHandler {
    pub fn new(chat_use_case: Arc<ChatSessionUseCase>) -> Self {
        Self { chat_use_case }
    }

    pub async fn send_message(
        State(handler): State<Arc<ChatHandler>>,
        Json(request): Json<ChatRequestDto>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler
            .chat_use_case
            .send_message(request.session_id, &request.question)
            .await
        {
            Ok(reply) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ChatResponseDto::from(reply))),
            )),
            Err(e) => Ok(error_response(e)),
        }
    }

    pub async fn get_messages(
        State(handler): State<Arc<ChatHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.chat_use_case.history(session_id).await {
            Ok(conversation) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ConversationDto::from(&conversation))),
            )),
            Err(e) => Ok(error_response(e)),
        }
    }

    pub async fn clear_session(
        State(handler): State<Arc<ChatHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> Result<impl IntoResponse, StatusCode> {
        match handler.chat_use_case.end_session(session_id).await {
            Ok(()) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(SessionClearedDto::new(session_id))),
            )),
            Err(e) => Ok(error_response(e)),
        }
    }
}
