use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewOffer, Offer};
use crate::db::{with_timeout, RepoError};

/// Append-only offer storage; ingestion never reads back.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    /// Returns the stored record, including its store-assigned id.
    async fn insert(&self, offer: &NewOffer) -> Result<Offer, RepoError>;
}

#[derive(Clone)]
pub struct PgOfferRepository {
    db: PgPool,
}

impl PgOfferRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OfferRepository for PgOfferRepository {
    async fn insert(&self, offer: &NewOffer) -> Result<Offer, RepoError> {
        with_timeout(
            "insert offer",
            sqlx::query_as::<_, Offer>(
                r#"
                INSERT INTO offers (sender_email, subject, body, brand, source, tags, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, sender_email, subject, body, brand, source, tags, created_at
                "#,
            )
            .bind(offer.sender_email.as_str())
            .bind(offer.subject.as_str())
            .bind(offer.body.as_str())
            .bind(offer.brand.as_deref())
            .bind(offer.source.as_deref())
            .bind(&offer.tags)
            .bind(offer.created_at)
            .fetch_one(&self.db),
        )
        .await
    }
}
