//! API request and response types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::RabotError;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub system_name: String,
    pub index_chunks: usize,
}

/// Question request
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Result of clearing the history
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub removed: usize,
}

/// Error response carrying an HTTP status and an `ApiResponse` body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RabotError> for ApiError {
    fn from(err: RabotError) -> Self {
        // Failures of the upstream model or embedding services are gateway errors
        let status = match err {
            RabotError::HttpError(_) | RabotError::LlmError(_) | RabotError::EmbeddingError(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_map_to_bad_gateway() {
        let err = ApiError::from(RabotError::HttpError("timeout".to_string()));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.contains("timeout"));

        let err = ApiError::from(RabotError::LlmError("429".to_string()));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_other_errors_map_to_internal_error() {
        let err = ApiError::from(RabotError::IndexError("bad".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_response_serialization() {
        let json = serde_json::to_value(ApiResponse::success(3)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 3);
        assert!(json["error"].is_null());

        let json = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "nope");
    }
}
