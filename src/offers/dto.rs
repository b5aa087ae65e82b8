use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Offer fields after wire decoding, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferPayload {
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub brand: Option<String>,
    pub source: Option<String>,
    pub tags: Vec<String>,
}

/// JSON webhook body (Mailchimp-style routing).
#[derive(Debug, Deserialize)]
pub struct MailchimpOffer {
    #[serde(default, alias = "senderEmail")]
    pub sender_email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<MailchimpOffer> for OfferPayload {
    fn from(o: MailchimpOffer) -> Self {
        Self {
            sender_email: o.sender_email,
            subject: o.subject.unwrap_or_default(),
            body: o.body.unwrap_or_default(),
            brand: non_empty(o.brand),
            source: non_empty(o.source),
            tags: o.tags.unwrap_or_default(),
        }
    }
}

/// Mailgun inbound route form payload.
///
/// Mailgun sends form-encoded data with hyphenated field names. Fields we do
/// not store are ignored.
#[derive(Debug, Deserialize)]
pub struct MailgunForm {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, rename = "body-plain")]
    pub body_plain: Option<String>,
    #[serde(default, rename = "stripped-text")]
    pub stripped_text: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub tags: Option<String>,
}

impl From<MailgunForm> for OfferPayload {
    fn from(f: MailgunForm) -> Self {
        let body = non_empty(f.body_plain)
            .or_else(|| non_empty(f.stripped_text))
            .unwrap_or_default();
        let tags = f
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            sender_email: f.sender,
            subject: f.subject,
            body,
            brand: non_empty(f.brand),
            source: non_empty(f.source),
            tags,
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub message: &'static str,
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
