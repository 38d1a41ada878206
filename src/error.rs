use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::email::SendError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    DeliveryError(String),

    #[error("origin not allowed")]
    OriginNotAllowed,

    #[error("not found")]
    NotFound,

    #[error("Internal server error")]
    InternalError(String),
}

impl From<mailrelay_contact::Error> for AppError {
    fn from(err: mailrelay_contact::Error) -> Self {
        if err.is_validation() {
            AppError::ValidationError(err.to_string())
        } else {
            AppError::InternalError(err.to_string())
        }
    }
}

impl From<SendError> for AppError {
    fn from(err: SendError) -> Self {
        AppError::DeliveryError(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::OriginNotAllowed => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DeliveryError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        match &self {
            AppError::ValidationError(msg) => {
                tracing::debug!(error = %msg, "Rejected submission");
            }
            AppError::DeliveryError(msg) => {
                tracing::error!(error = %msg, "Delivery error");
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
            }
            AppError::OriginNotAllowed | AppError::NotFound => {}
        }

        (
            status_code,
            Json(json!({ "ok": false, "error": self.to_string() })),
        )
            .into_response()
    }
}
