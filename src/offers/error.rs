use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::RepoError;

#[derive(Debug, Error)]
pub enum OfferError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("mailing-list subscription failed: {0:#}")]
    SubscriptionFailed(anyhow::Error),
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<RepoError> for OfferError {
    fn from(err: RepoError) -> Self {
        OfferError::Internal(err.into())
    }
}

impl IntoResponse for OfferError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            OfferError::InvalidPayload(reason) => {
                warn!(%reason, "offer payload rejected");
                (StatusCode::BAD_REQUEST, reason)
            }
            OfferError::SubscriptionFailed(e) => {
                error!(error = %format!("{e:#}"), "mailing-list subscription failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to subscribe to mailing list".to_string(),
                )
            }
            OfferError::Internal(e) => {
                error!(error = %format!("{e:#}"), "offer ingestion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store offer".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
