use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::db::StoreError;

/// Application-level failures. Every variant is converted to a direct
/// response at the handler boundary; nothing here crashes the process.
///
/// Lookup and credential failures are deliberately surfaced as plain
/// user-visible messages with a 200 status rather than HTTP error codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No account found with this email")]
    AccountNotFound,

    #[error("No account found with this username or email")]
    IdentifierNotFound,

    #[error("Wrong email or password")]
    InvalidCredential,

    /// Signup collision on the email key. The message never says which
    /// field conflicted.
    #[error("Error creating user")]
    DuplicateKey,

    /// Signature, structure or expiry failure. The cause is never revealed.
    #[error("Invalid or expired reset token")]
    InvalidToken,

    /// Structurally valid token presented for the wrong purpose.
    #[error("Invalid reset token")]
    WrongPurpose,

    /// User-correctable input problem, message shown verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Something went wrong")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateKey | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::OK,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!(%detail, "internal error");
        }
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey => AppError::DuplicateKey,
            StoreError::NotFound => AppError::Internal("record missing".to_string()),
        }
    }
}
