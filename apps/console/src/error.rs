use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use rbac_console_core::AppError;

use crate::render;

/// Console error wrapper around core application errors.
#[derive(Debug)]
pub struct ConsoleError(pub AppError);

impl From<AppError> for ConsoleError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Transport(_) | AppError::Service { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Html(render::error_page(&self.0.to_string()))).into_response()
    }
}

/// Standard console handler result type.
pub type ConsoleResult<T> = Result<T, ConsoleError>;
