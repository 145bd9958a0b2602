//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patient_registry_core::{RegistryError, SortError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by handlers. Every variant renders as `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn internal(error: anyhow::Error) -> Self {
        ApiError::Internal(error)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(source) = &self {
            let chain = format!("{source:#}");
            tracing::error!(error = %chain, "Request failed");
        } else {
            tracing::debug!(%status, detail = %self, "Request rejected");
        }
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(_) => ApiError::NotFound("Patient not found".to_string()),
            RegistryError::AlreadyExists(_) => {
                ApiError::Conflict("Patient already exists".to_string())
            }
            RegistryError::Validation(v) => v.into(),
            other @ (RegistryError::Storage(_) | RegistryError::LockPoisoned) => {
                ApiError::internal(anyhow::Error::new(other))
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Unprocessable(e.to_string())
    }
}

impl From<SortError> for ApiError {
    fn from(e: SortError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        match e {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable(e.body_text()),
            _ => ApiError::BadRequest(e.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Unprocessable(e.body_text())
    }
}
