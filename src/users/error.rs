use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::RepoError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password must be at least 8 characters long")]
    InvalidPassword,
    #[error("Name is required")]
    InvalidName,
    #[error("Invalid user id")]
    InvalidId,
    #[error("Email already exists")]
    EmailExists,
    #[error("User not found")]
    NotFound,
    /// Unknown email and wrong password are deliberately the same error.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for UserError {
    fn from(err: RepoError) -> Self {
        match err {
            // only the unique email index can raise this on `users`
            RepoError::DuplicateKey => UserError::EmailExists,
            RepoError::Other(e) => UserError::Internal(e),
        }
    }
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::InvalidEmail
            | UserError::InvalidPassword
            | UserError::InvalidName
            | UserError::InvalidId => StatusCode::BAD_REQUEST,
            UserError::EmailExists => StatusCode::CONFLICT,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::InvalidCredentials | UserError::InvalidToken => StatusCode::UNAUTHORIZED,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            UserError::Internal(e) => {
                error!(error = %format!("{e:#}"), "user request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
