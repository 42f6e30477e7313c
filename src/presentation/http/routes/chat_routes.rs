use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(chat_handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/api/chat", post(ChatHandler::send_message))
        .route("/api/sessions/{id}", delete(ChatHandler::clear_session))
        .route("/api/sessions/{id}/messages", get(ChatHandler::get_messages))
        .with_state(chat_handler)
}
