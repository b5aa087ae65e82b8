use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    dto::OfferPayload,
    error::OfferError,
    mailing_list::MailingList,
    provider::Provider,
    repo::OfferRepository,
    repo_types::{NewOffer, Offer},
};
use crate::validate::is_valid_email;

/// Result of one accepted webhook.
#[derive(Debug)]
pub struct Ingested {
    pub offer: Offer,
    pub subscribed: bool,
}

/// Single webhook entry point; the wire shape comes from `provider`.
#[derive(Clone)]
pub struct OfferService {
    provider: Provider,
    repo: Arc<dyn OfferRepository>,
    mailing_list: Option<Arc<dyn MailingList>>,
}

impl OfferService {
    pub fn new(
        provider: Provider,
        repo: Arc<dyn OfferRepository>,
        mailing_list: Option<Arc<dyn MailingList>>,
    ) -> Self {
        Self {
            provider,
            repo,
            mailing_list,
        }
    }

    /// Decodes a raw webhook body with the configured provider and ingests it.
    pub async fn receive(&self, body: &[u8]) -> Result<Ingested, OfferError> {
        let payload = self.provider.decode(body)?;
        self.ingest(payload).await
    }

    /// A failed subscription aborts the whole ingestion: nothing is stored.
    pub async fn ingest(&self, payload: OfferPayload) -> Result<Ingested, OfferError> {
        let sender = payload.sender_email.trim();
        if sender.is_empty() {
            return Err(OfferError::InvalidPayload("sender email is required".into()));
        }
        if !is_valid_email(sender) {
            warn!(sender = %sender, provider = %self.provider, "invalid sender email");
            return Err(OfferError::InvalidPayload("invalid sender email".into()));
        }

        let subscribed = match &self.mailing_list {
            Some(list) => {
                list.subscribe(sender)
                    .await
                    .map_err(OfferError::SubscriptionFailed)?;
                true
            }
            None => false,
        };

        let offer = self
            .repo
            .insert(&NewOffer {
                sender_email: sender.to_string(),
                subject: payload.subject,
                body: payload.body,
                brand: payload.brand,
                source: payload.source,
                tags: payload.tags,
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;

        info!(
            offer_id = %offer.id,
            sender = %offer.sender_email,
            provider = %self.provider,
            subscribed,
            "offer stored"
        );
        Ok(Ingested { offer, subscribed })
    }
}
