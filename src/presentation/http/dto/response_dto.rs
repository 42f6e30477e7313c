use serde::Serialize;
use uuid::Uuid;

/// Envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.into(),
                details: None,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.details = Some(details.into());
        }
        self
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
}

impl HealthResponseDto {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionClearedDto {
    pub session_id: Uuid,
    pub message: String,
}

impl SessionClearedDto {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            message: "Chat history cleared".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope() {
        let response: ApiResponse<()> =
            ApiResponse::failure("EMPTY_QUESTION", "Question cannot be empty");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "EMPTY_QUESTION");
        assert!(json["error"]["details"].is_null());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_details_only_attach_to_failures() {
        let failed: ApiResponse<()> =
            ApiResponse::failure("CHAT_FAILED", "Generation failed").with_details("HTTP 529");
        assert_eq!(failed.error.unwrap().details.as_deref(), Some("HTTP 529"));

        let ok = ApiResponse::success(1).with_details("ignored");
        assert!(ok.error.is_none());
    }
}
