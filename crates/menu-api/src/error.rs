use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use menu_core::error::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::BadGateway(_) => "UPSTREAM_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::ValidationError(_)
            | DomainError::InvalidCategory(_)
            | DomainError::InvalidImage(_) => ApiError::BadRequest(message),
            DomainError::MenuItemNotFound(_) => ApiError::NotFound(message),
            DomainError::MutationInProgress(_) => ApiError::Conflict(message),
            DomainError::InvalidCredentials | DomainError::Unauthenticated => {
                ApiError::Unauthorized(message)
            }
            DomainError::UploadFailed(_)
            | DomainError::DocumentStoreError(_)
            | DomainError::ObjectStoreError(_)
            | DomainError::AuthProviderError(_) => ApiError::BadGateway(message),
            DomainError::InternalError(_) => ApiError::InternalError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => {
                tracing::warn!("{} {}: {}", status.as_u16(), self.code(), msg);
                msg.clone()
            }
            ApiError::BadGateway(msg) | ApiError::InternalError(msg) => {
                tracing::error!("{} {}: {}", status.as_u16(), self.code(), msg);
                msg.clone()
            }
        };

        let body = Json(ApiResponse::<()>::error(self.code(), &message));
        (status, body).into_response()
    }
}
