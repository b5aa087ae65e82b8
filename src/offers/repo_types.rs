use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored forwarded promotional email. Written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Offer {
    pub id: Uuid,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub brand: Option<String>,  // e.g. "Zara"
    pub source: Option<String>, // e.g. "email"
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewOffer {
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub brand: Option<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
}
