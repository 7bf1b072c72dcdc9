use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::render::OutputFormat;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidData(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The body could not be read at all (too large, wrong encoding).
    #[error("Request rejected: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Error generating {} file: {message}", .format.label())]
    Generation {
        format: OutputFormat,
        message: String,
    },

    #[error("Generated {} file is empty", .0.label())]
    EmptyOutput(OutputFormat),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingData(_) | AppError::InvalidData(_) | AppError::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Rejected { status, .. } => *status,
            AppError::Generation { .. }
            | AppError::EmptyOutput(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (label, message) = match &self {
            AppError::MissingData(msg) => ("Missing data", msg.clone()),
            AppError::InvalidData(msg) => ("Invalid data format", msg.clone()),
            AppError::UnsupportedFormat(format) => (
                "Unsupported format",
                format!("Format '{format}' is not supported; use PDF, DOCX or TXT"),
            ),
            AppError::Rejected { message, .. } => ("Invalid request", message.clone()),
            AppError::Generation { .. } => {
                tracing::error!("{self}");
                ("File generation failed", self.to_string())
            }
            AppError::EmptyOutput(_) => {
                tracing::error!("{self}");
                ("Empty file", self.to_string())
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                ("File generation failed", e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "Internal error",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": label,
            "message": message
        }));

        (status, body).into_response()
    }
}
