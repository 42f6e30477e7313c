pub mod anthropic_client;
pub mod document_extractors;
pub mod inference_client;
#[cfg(feature = "local-embeddings")]
pub mod local_embeddings;

pub use anthropic_client::AnthropicClient;
pub use inference_client::InferenceEmbeddingProvider;
#[cfg(feature = "local-embeddings")]
pub use local_embeddings::LocalEmbeddingProvider;
