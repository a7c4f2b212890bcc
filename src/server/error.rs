use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::completion::CompletionError;
use crate::prompt::TemplateError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request body is not a JSON object: {0}")]
    InvalidBody(String),

    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),
}

/// Every failure is an undifferentiated 500. Callers log the cause.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
