use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::presentation::http::{
    handlers::{ChatHandler, InfoHandler, SearchHandler},
    routes::{chat_routes, health_routes, info_routes, search_routes},
};

pub struct HttpServer {
    chat_handler: Arc<ChatHandler>,
    search_handler: Arc<SearchHandler>,
    info_handler: Arc<InfoHandler>,
    host: String,
    port: u16,
}

impl HttpServer {
    pub fn new(
        chat_handler: Arc<ChatHandler>,
        search_handler: Arc<SearchHandler>,
        info_handler: Arc<InfoHandler>,
        host: String,
        port: u16,
    ) -> Self {
        Self {
            chat_handler,
            search_handler,
            info_handler,
            host,
            port,
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .merge(health_routes())
            .merge(chat_routes(self.chat_handler.clone()))
            .merge(search_routes(self.search_handler.clone()))
            .merge(info_routes(self.info_handler.clone()))
            .layer(cors)
            .layer(RequestBodyLimitLayer::new(64 * 1024))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<_>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<_>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    /// Resolves `host` (an IP or a hostname such as `localhost`) and binds it.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = self.bind().await?;
        let app = self.router();

        tracing::info!("Chat UI listening on http://{}", listener.local_addr()?);
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::services::{
        EmbeddingService, GenerationSettings, RagChain, SearchService,
    };
    use crate::application::test_support::{HashingEmbeddingProvider, ScriptedLanguageModel};
    use crate::application::use_cases::{ChatSessionUseCase, SearchContentUseCase};
    use crate::domain::entities::ContentChunk;
    use crate::domain::repositories::VectorIndex;
    use crate::domain::value_objects::SOURCE_TITLE;
    use crate::infrastructure::sessions::InMemoryConversationRepository;
    use crate::infrastructure::vector_store::FlatIndex;
    use crate::presentation::EXAMPLE_QUESTIONS;

    async fn test_server(model: ScriptedLanguageModel, host: &str, port: u16) -> HttpServer {
        let embedding_service = Arc::new(EmbeddingService::new(
            Arc::new(HashingEmbeddingProvider::new(32)),
            8,
        ));
        let chunks: Vec<ContentChunk> = [
            (30, "36 Primary duty of care of PCBU"),
            (35, "44 Duty of officers"),
            (41, "56 Duty to notify notifiable event"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (page, text))| {
            ContentChunk::new(i, *page, 0, "HSWA".into(), false, text.to_string())
        })
        .collect();
        let vectors = embedding_service.embed_chunks(&chunks).await.unwrap();
        let index = Arc::new(FlatIndex::new("hashing-test-model"));
        index.add_batch(&chunks, vectors).await.unwrap();

        let search = Arc::new(SearchService::new(embedding_service, index.clone()));
        let model = Arc::new(model);
        let chain = Arc::new(RagChain::new(
            search.clone(),
            model,
            GenerationSettings::default(),
        ));
        let chat = Arc::new(ChatSessionUseCase::new(
            chain,
            Arc::new(InMemoryConversationRepository::default()),
        ));

        HttpServer::new(
            Arc::new(ChatHandler::new(chat.clone())),
            Arc::new(SearchHandler::new(Arc::new(SearchContentUseCase::new(search)))),
            Arc::new(InfoHandler::new(
                index,
                chat.clone(),
                "scripted-test-model".to_string(),
            )),
            host.to_string(),
            port,
        )
    }

    async fn test_router(model: ScriptedLanguageModel) -> Router {
        test_server(model, "127.0.0.1", 3000).await.router()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_binds_hostname() {
        let server = test_server(ScriptedLanguageModel::answering("ok"), "localhost", 0).await;

        let listener = server.bind().await.unwrap();

        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_health_and_ui() {
        let router = test_router(ScriptedLanguageModel::answering("ok")).await;

        let (status, body) = send(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "healthy");

        let response = router.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("WorkSafe NZ AI Assistant"));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let router = test_router(ScriptedLanguageModel::answering(
            "According to Section 36 (page 30)...",
        ))
        .await;

        let (status, body) = send(
            &router,
            post_json("/api/chat", json!({ "question": "What is a PCBU's primary duty of care?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["message"]["role"], "assistant");
        assert_eq!(body["data"]["message"]["text"], "According to Section 36 (page 30)...");
        let sources = body["data"]["message"]["sources"].as_array().unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0]["rank"], 1);
        assert_eq!(sources[0]["page"], 30);

        let session_id = body["data"]["session_id"].as_str().unwrap().to_string();
        let (status, history) = send(
            &router,
            get(&format!("/api/sessions/{}/messages", session_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["data"]["messages"].as_array().unwrap().len(), 2);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/sessions/{}", session_id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &router,
            get(&format!("/api/sessions/{}/messages", session_id)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_blank_question_is_bad_request() {
        let router = test_router(ScriptedLanguageModel::answering("unused")).await;

        let (status, body) = send(&router, post_json("/api/chat", json!({ "question": "  " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMPTY_QUESTION");
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_server_error() {
        let router = test_router(ScriptedLanguageModel::failing()).await;

        let (status, body) =
            send(&router, post_json("/api/chat", json!({ "question": "Who is an officer?" }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"]["message"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let router = test_router(ScriptedLanguageModel::answering("ok")).await;

        let (status, body) = send(
            &router,
            get("/api/sessions/7f1e4a52-0c1b-4d2a-9a7e-0b5f1f8f2c11/messages"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let router = test_router(ScriptedLanguageModel::answering("ok")).await;

        let (status, body) = send(&router, get("/api/search?query=duty%20of%20officers&limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_results"], 2);

        let (status, body) = send(&router, get("/api/search?query=duty&limit=21")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_LIMIT");

        let (status, body) = send(&router, get("/api/search?query=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMPTY_QUERY");
    }

    #[tokio::test]
    async fn test_info_and_examples() {
        let router = test_router(ScriptedLanguageModel::answering("ok")).await;

        let (status, body) = send(&router, get("/api/info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["document_title"], SOURCE_TITLE);
        assert_eq!(body["data"]["vector_count"], 3);
        assert_eq!(body["data"]["dimension"], 32);
        assert_eq!(body["data"]["embedding_model"], "hashing-test-model");
        assert_eq!(body["data"]["llm_model"], "scripted-test-model");
        assert_eq!(body["data"]["active_sessions"], 0);

        let (_, body) = send(&router, get("/api/examples")).await;
        assert_eq!(
            body["data"]["questions"].as_array().unwrap().len(),
            EXAMPLE_QUESTIONS.len()
        );
    }
}
