use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::binding::ParamError;
use crate::models::problem::{OasError, OasErrorDetail, Problem};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidParameter(#[from] ParamError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidParameter(_) | AppError::InvalidBody(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match &self {
            AppError::InvalidParameter(e) => {
                tracing::debug!(param = e.param(), "Rejected parameter: {e}");
                e.to_string()
            }
            AppError::InvalidBody(e) => {
                tracing::debug!("Rejected request body: {e}");
                let body = OasError {
                    message: Some("Request body could not be decoded".to_string()),
                    errors: Some(vec![OasErrorDetail {
                        error_code: Some("INVALID_BODY".to_string()),
                        message: Some(e.to_string()),
                        path: Some(format!("line {}, column {}", e.line(), e.column())),
                    }]),
                };
                return (status, Json(body)).into_response();
            }
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                "A database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let problem = Problem {
            type_uri: Some("about:blank".to_string()),
            title: status.canonical_reason().map(str::to_string),
            status: Some(status.as_u16()),
            detail: Some(detail),
            instance: None,
        };

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
