use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors raised by the pure build pipeline (normalize → vectorize → index)
///
/// Kept `Clone` so a single failed build can be handed to every caller
/// that was waiting on it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Duplicate record id {0} in corpus")]
    DuplicateId(i64),

    #[error("Build task failed: {0}")]
    Task(String),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data format error: {0}")]
    DataFormat(String),

    #[error("Recommendation index is not built yet")]
    BuildNotReady,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Details unavailable for movie {0}")]
    EnrichmentUnavailable(i64),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<BuildError> for AppError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::DataFormat(msg) => AppError::DataFormat(msg),
            BuildError::DuplicateId(_) => AppError::DataFormat(err.to_string()),
            BuildError::Task(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DataFormat(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::BuildNotReady => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Cache(_) | AppError::Io(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) | AppError::EnrichmentUnavailable(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
