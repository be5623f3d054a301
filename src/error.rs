use crate::core::MatchError;
use crate::models::ErrorResponse;
use crate::services::{CacheError, PaymentError, StoreError};
use actix_web::http::StatusCode;
use actix_web::{error, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Please sign in.";

/// Error returned by HTTP handlers
///
/// Every variant renders as an `ErrorResponse` JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Payment provider error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn error_label(&self) -> String {
        match self {
            ApiError::Unauthorized(_) => UNAUTHORIZED_MESSAGE.to_string(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                msg.clone()
            }
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::Payment(_) => "Failed to create checkout session".to_string(),
            ApiError::Store(_) | ApiError::Cache(_) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Unauthorized(reason) => reason.clone(),
            // Storage details stay in the logs
            ApiError::Store(_) | ApiError::Cache(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidInput(msg) => ApiError::BadRequest(msg),
            MatchError::EmptyPool => ApiError::NotFound("No candidates available".to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Payment(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Cache(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.error_label(),
            message: self.public_message(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_unauthorized_body() {
        let response = ApiError::Unauthorized("missing Authorization header".into()).error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], UNAUTHORIZED_MESSAGE);
        assert_eq!(json["status_code"], 401);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(MatchError::InvalidInput("no skills".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Payment(PaymentError::ApiError("402".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Store(StoreError::NotFound("m".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
