use axum::{extract::State, routing::post, Json, Router};
use bytes::Bytes;
use tracing::instrument;

use super::{dto::OfferResponse, error::OfferError, provider::Provider};
use crate::state::AppState;

/// Both routes live under the active provider's name only.
pub fn offer_routes(provider: Provider) -> Router<AppState> {
    Router::new().route(
        &format!("/offer/{}", provider.name()),
        post(receive_offer).get(verify_webhook),
    )
}

#[instrument(skip(state, body))]
pub async fn receive_offer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<OfferResponse>, OfferError> {
    let ingested = state.offers.receive(&body).await?;
    let message = if ingested.subscribed {
        "Offer stored and user subscribed to mailing list successfully"
    } else {
        "Offer stored successfully"
    };
    Ok(Json(OfferResponse {
        message,
        id: ingested.offer.id,
        created_at: ingested.offer.created_at,
    }))
}

/// Provider webhook registration handshake.
pub async fn verify_webhook() -> &'static str {
    "Webhook endpoint verified"
}
