use std::{fmt, str::FromStr};

use super::{
    dto::{MailchimpOffer, MailgunForm, OfferPayload},
    error::OfferError,
};

/// Which webhook wire shape this deployment accepts. Chosen by config,
/// never by sniffing the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// JSON body.
    Mailchimp,
    /// `application/x-www-form-urlencoded` body.
    Mailgun,
}

impl Provider {
    /// Path segment under `/offer/`.
    pub fn name(self) -> &'static str {
        match self {
            Provider::Mailchimp => "mailchimp",
            Provider::Mailgun => "mailgun",
        }
    }

    pub fn decode(self, body: &[u8]) -> Result<OfferPayload, OfferError> {
        match self {
            Provider::Mailchimp => serde_json::from_slice::<MailchimpOffer>(body)
                .map(OfferPayload::from)
                .map_err(|e| OfferError::InvalidPayload(format!("invalid JSON body: {e}"))),
            Provider::Mailgun => serde_urlencoded::from_bytes::<MailgunForm>(body)
                .map(OfferPayload::from)
                .map_err(|e| OfferError::InvalidPayload(format!("invalid form body: {e}"))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mailchimp" => Ok(Provider::Mailchimp),
            "mailgun" => Ok(Provider::Mailgun),
            other => anyhow::bail!("unknown offer provider `{other}` (expected mailchimp or mailgun)"),
        }
    }
}
