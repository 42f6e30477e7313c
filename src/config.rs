use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

pub const DEFAULT_PDF_PATH: &str = "hswa-docs/Health and Safety at Work Act 2015.pdf";
pub const DEFAULT_INDEX_DIR: &str = "data/hswa_vectorstore";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: String, value: String, reason: String },
    InvalidUrl { key: String, value: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "Invalid value '{}' for {}: {}", value, key, reason)
            }
            ConfigError::InvalidUrl { key, value, reason } => {
                write!(f, "Invalid URL '{}' for {}: {}", value, key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Local,
    Remote,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(EmbeddingBackend::Local),
            "remote" => Ok(EmbeddingBackend::Remote),
            other => Err(format!("unknown embedding backend '{}', use local or remote", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model_name: String,
    pub cache_dir: Option<PathBuf>,
    pub service_url: String,
    pub batch_size: usize,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub max_sessions: usize,
    pub idle_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_minutes: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pdf_path: PathBuf,
    pub index_dir: PathBuf,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
    pub sessions: SessionConfig,
}

impl AppConfig {
    /// Reads configuration from the process environment. Call after `.env` has been loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chunking = ChunkingConfig {
            chunk_size: parse_or(&lookup, "HSWA_CHUNK_SIZE", 500)?,
            chunk_overlap: parse_or(&lookup, "HSWA_CHUNK_OVERLAP", 50)?,
        };

        let service_url = lookup("EMBEDDINGS_SERVICE_URL")
            .unwrap_or_else(|| "https://example.workers.dev".to_string());
        validate_url("EMBEDDINGS_SERVICE_URL", &service_url)?;

        let base_url = lookup("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string());
        validate_url("ANTHROPIC_BASE_URL", &base_url)?;

        let embedding = EmbeddingConfig {
            backend: parse_or(&lookup, "EMBEDDING_BACKEND", EmbeddingBackend::Local)?,
            model_name: lookup("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            cache_dir: lookup("EMBEDDING_CACHE_DIR").map(PathBuf::from),
            service_url,
            batch_size: parse_or(&lookup, "EMBEDDING_BATCH_SIZE", 32)?,
        };

        let llm = LlmConfig {
            api_key: lookup("ANTHROPIC_API_KEY").filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: lookup("HSWA_LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            temperature: parse_or(&lookup, "HSWA_LLM_TEMPERATURE", 0.0)?,
            max_tokens: parse_or(&lookup, "HSWA_LLM_MAX_TOKENS", 2048)?,
        };

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
        };

        let sessions = SessionConfig {
            max_sessions: parse_or(&lookup, "HSWA_MAX_SESSIONS", 1000)?,
            idle_minutes: parse_or(&lookup, "HSWA_SESSION_IDLE_MINUTES", 60)?,
        };

        Ok(Self {
            pdf_path: lookup("HSWA_PDF_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PDF_PATH)),
            index_dir: lookup("HSWA_INDEX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_DIR)),
            chunking,
            top_k: parse_or(&lookup, "HSWA_TOP_K", 4)?,
            embedding,
            llm,
            server,
            sessions,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(default),
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
