use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::InfoHandler;

pub fn info_routes(info_handler: Arc<InfoHandler>) -> Router {
    Router::new()
        .route("/api/info", get(InfoHandler::index_info))
        .route("/api/examples", get(InfoHandler::examples))
        .with_state(info_handler)
}
