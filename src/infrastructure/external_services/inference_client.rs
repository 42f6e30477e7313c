use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::application::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError, normalize,
};
use crate::config::EmbeddingConfig;

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub text: TextInput,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        Self {
            service_url: "https://example.workers.dev".to_string(),
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

impl EmbeddingsClientConfig {
    /// Delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis((self.backoff_factor.powi(attempt as i32 - 1) * 1000.0) as u64)
    }
}

#[derive(Debug)]
pub enum EmbeddingsError {
    RequestError(String),
    ParseError(String),
    MaxRetriesExceeded(String),
}

impl std::fmt::Display for EmbeddingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingsError::RequestError(msg) => write!(f, "Request failed: {}", msg),
            EmbeddingsError::ParseError(msg) => write!(f, "Invalid response: {}", msg),
            EmbeddingsError::MaxRetriesExceeded(msg) => write!(f, "Max retries exceeded: {}", msg),
        }
    }
}

impl std::error::Error for EmbeddingsError {}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn get_embedding(&self, text: &str) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Single(text.to_string()),
        };

        self.send_request(request).await
    }

    pub async fn get_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts),
        };

        self.send_request(request).await
    }

    async fn send_request(
        &self,
        request: EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempts > self.config.max_retries {
                        return Err(EmbeddingsError::MaxRetriesExceeded(e.to_string()));
                    }

                    let backoff_time = self.config.backoff(attempts);
                    warn!(
                        "Embedding request failed (attempt {}): {}; retrying in {:?}",
                        attempts, e, backoff_time
                    );
                    tokio::time::sleep(backoff_time).await;
                }
            }
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsError::RequestError(format!("{}: {}", status, body)));
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

/// Embeds through a remote HTTP inference service.
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
    model_name: String,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient, model_name: &str) -> Self {
        Self {
            client,
            model_name: model_name.to_string(),
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, ReqwestError> {
        let client = InferenceClient::new(EmbeddingsClientConfig {
            service_url: config.service_url.clone(),
            ..EmbeddingsClientConfig::default()
        })?;
        Ok(Self::new(client, &config.model_name))
    }
}

fn map_client_error(e: EmbeddingsError) -> EmbeddingProviderError {
    match e {
        EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
        EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        EmbeddingsError::MaxRetriesExceeded(msg) => {
            warn!("Giving up on embedding service: {}", msg);
            EmbeddingProviderError::ServiceUnavailable
        }
    }
}

fn normalized(mut embeddings: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    embeddings.iter_mut().for_each(|v| normalize(v));
    embeddings
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn embed_documents(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected = texts.len();
        let response = self
            .client
            .get_embeddings(texts)
            .await
            .map_err(map_client_error)?;

        if response.embeddings.len() != expected {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, service returned {}",
                expected,
                response.embeddings.len()
            )));
        }

        Ok(normalized(response.embeddings))
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        let response = self
            .client
            .get_embedding(text)
            .await
            .map_err(map_client_error)?;

        normalized(response.embeddings)
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embedding_dimension(&self) -> Option<usize> {
        None
    }
}
