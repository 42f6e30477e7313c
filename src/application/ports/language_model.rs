use async_trait::async_trait;

#[derive(Debug)]
pub enum LanguageModelError {
    MissingApiKey,
    NetworkError(String),
    ApiError { status: u16, body: String },
    ParseError(String),
    EmptyResponse,
}

impl std::fmt::Display for LanguageModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LanguageModelError::MissingApiKey => write!(
                f,
                "ANTHROPIC_API_KEY not found in environment variables. \
                 Please create a .env file with: ANTHROPIC_API_KEY=your_key_here"
            ),
            LanguageModelError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LanguageModelError::ApiError { status, body } => {
                write!(f, "LLM provider returned {}: {}", status, body)
            }
            LanguageModelError::ParseError(msg) => {
                write!(f, "Failed to parse LLM response: {}", msg)
            }
            LanguageModelError::EmptyResponse => write!(f, "LLM response missing text content"),
        }
    }
}

impl std::error::Error for LanguageModelError {}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError>;

    fn model_name(&self) -> &str;
}
