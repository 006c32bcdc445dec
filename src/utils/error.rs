use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Question must be at least 5 characters long")]
    InvalidQuestion,

    #[error("A poll needs at least 2 non-empty options")]
    InsufficientOptions,

    #[error("closesAt is not a valid date")]
    InvalidClosesAt,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Poll is closed. Voting is not allowed")]
    PollClosed,

    #[error("This poll accepts only one option per vote")]
    CardinalityViolation,

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidQuestion => "INVALID_QUESTION",
            AppError::InsufficientOptions => "INSUFFICIENT_OPTIONS",
            AppError::InvalidClosesAt => "INVALID_CLOSES_AT",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::PollClosed => "POLL_CLOSED",
            AppError::CardinalityViolation => "CARDINALITY_VIOLATION",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::SerializationError(_) => "SERIALIZATION_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidQuestion
            | AppError::InsufficientOptions
            | AppError::InvalidClosesAt
            | AppError::InvalidRequest(_)
            | AppError::PollClosed
            | AppError::CardinalityViolation => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::DatabaseError(_)
            | AppError::SerializationError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn poll_not_found() -> Self {
        AppError::NotFound("Poll not found".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and answered generically.
        let message = match &self {
            AppError::DatabaseError(_) => {
                error!(error = %self, "database operation failed");
                "Database operation failed".to_string()
            }
            AppError::SerializationError(_) => {
                error!(error = %self, "data serialization failed");
                "Data serialization failed".to_string()
            }
            AppError::InternalError(_) => {
                error!(error = %self, "internal error");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: message,
            code: self.code().to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}
