use axum::{
    Json, Router,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};

use crate::presentation::http::dto::{ApiResponse, HealthResponseDto};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}

async fn root_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthResponseDto::healthy())),
    )
}
