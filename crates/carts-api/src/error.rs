//! # API Errors
//!
//! Maps `CartsError` to a JSON error response. Server-side failures get a
//! generic message; their detail only goes to the log.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use carts_core::CartsError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

/// Error returned by handlers and extractors
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CartsError);

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// A JSON request body whose rejection is answered as an `ApiError`
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(CartsError::InvalidDocument(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.status_code();

        if self.0.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            debug!("Request rejected: {}", self.0);
        }

        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorResponse::new(self.0.public_message(), code))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Unauthorized access", 401);
        assert_eq!(err.error, "Unauthorized access");
        assert_eq!(err.code, 401);
    }

    #[test]
    fn test_status_mapping() {
        let response = ApiError::from(CartsError::Unauthenticated).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::from(CartsError::Forbidden("not admin".into())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ApiError::from(CartsError::upstream("mongodb", "boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        use axum::{body::Body, http::Request};

        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let err = ApiJson::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(err.0, CartsError::InvalidDocument(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
