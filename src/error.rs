use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::form::FILE_TOO_LARGE;

/// Message returned to callers for every server-side failure.
pub const GENERIC_FAILURE: &str = "Failed to process PDF";

#[derive(Error, Debug)]
pub enum FortressError {
    #[error("File and password are required")]
    MissingFields,

    #[error("Invalid file type. Only PDF files are allowed.")]
    InvalidFileType,

    #[error("Malformed multipart body")]
    MalformedUpload(String),

    #[error("{}", FILE_TOO_LARGE)]
    PayloadTooLarge,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Protect error: {0}")]
    Protect(String),
}

impl FortressError {
    pub fn status(&self) -> StatusCode {
        match self {
            FortressError::MissingFields
            | FortressError::InvalidFileType
            | FortressError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            FortressError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            FortressError::Io(_)
            | FortressError::Pdf(_)
            | FortressError::Protect(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Server errors never leak details.
    pub fn public_message(&self) -> String {
        if self.status().is_server_error() {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for FortressError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Error processing PDF: {}", self);
        } else if let FortressError::MalformedUpload(detail) = &self {
            tracing::debug!("Rejected upload: {}", detail);
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, FortressError>;
