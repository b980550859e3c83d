use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::routes::ErrorResponse;

/// Caller-visible failure kinds of a classification call.
///
/// The kind decides the HTTP status; the message only adds detail.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Classification service unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClassifyError {
    pub fn missing_file() -> Self {
        ClassifyError::InvalidInput("missing file".to_string())
    }

    pub fn not_an_image() -> Self {
        ClassifyError::InvalidInput("not an image".to_string())
    }

    pub fn file_too_large() -> Self {
        ClassifyError::InvalidInput("file exceeds the 10 MB limit".to_string())
    }
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        ClassifyError::UpstreamUnavailable(reason)
    }
}

impl ResponseError for ClassifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClassifyError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ClassifyError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ClassifyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
