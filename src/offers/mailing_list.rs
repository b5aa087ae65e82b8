use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::debug;

use crate::config::MailchimpConfig;

/// Outbound call budget. Not configurable, no retries.
pub const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Third-party contact list that offer senders are added to.
#[async_trait]
pub trait MailingList: Send + Sync {
    async fn subscribe(&self, email: &str) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct MemberRequest<'a> {
    email_address: &'a str,
    status: &'static str,
}

/// Mailchimp Marketing API v3 list-members client.
#[derive(Clone)]
pub struct MailchimpClient {
    http: reqwest::Client,
    members_url: String,
    api_key: String,
}

impl MailchimpClient {
    pub fn new(cfg: &MailchimpConfig) -> anyhow::Result<Self> {
        let dc = cfg
            .datacenter()
            .context("MAILCHIMP_API_KEY has no datacenter suffix (expected <key>-<dc>)")?;
        Self::with_base_url(cfg, &format!("https://{dc}.api.mailchimp.com"))
    }

    pub(crate) fn with_base_url(cfg: &MailchimpConfig, base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(SUBSCRIBE_TIMEOUT)
            .build()
            .context("build mailchimp http client")?;
        Ok(Self {
            http,
            members_url: members_url(base_url, &cfg.list_id),
            api_key: cfg.api_key.clone(),
        })
    }
}

fn members_url(base_url: &str, list_id: &str) -> String {
    format!("{}/3.0/lists/{list_id}/members", base_url.trim_end_matches('/'))
}

#[async_trait]
impl MailingList for MailchimpClient {
    async fn subscribe(&self, email: &str) -> anyhow::Result<()> {
        let resp = self
            .http
            .post(&self.members_url)
            // Mailchimp takes any username with the key as password
            .basic_auth("anystring", Some(&self.api_key))
            .json(&MemberRequest {
                email_address: email,
                status: "subscribed",
            })
            .send()
            .await
            .context("mailchimp request")?;

        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            anyhow::bail!("mailchimp api error: {status}");
        }
        debug!(%email, "subscribed to mailing list");
        Ok(())
    }
}

#[cfg(test)]
pub mod fake {
    use std::sync::Mutex;

    use super::*;

    /// Records subscriptions; optionally fails every call.
    #[derive(Default)]
    pub struct RecordingMailingList {
        subscribed: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingMailingList {
        pub fn failing() -> Self {
            Self {
                subscribed: Mutex::default(),
                fail: true,
            }
        }

        pub fn subscribed(&self) -> Vec<String> {
            self.subscribed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailingList for RecordingMailingList {
        async fn subscribe(&self, email: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("mailchimp api error: 503 Service Unavailable");
            }
            self.subscribed.lock().unwrap().push(email.to_string());
            Ok(())
        }
    }
}
