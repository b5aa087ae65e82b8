use anyhow::Context;

use crate::offers::provider::Provider;

const DEFAULT_TTL_MINUTES: i64 = 60 * 24;
/// One year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 366;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credentials for the mailing-list subscription side-effect.
#[derive(Debug, Clone)]
pub struct MailchimpConfig {
    pub api_key: String,
    pub list_id: String,
}

impl MailchimpConfig {
    /// Mailchimp keys look like `<key>-us21`; the suffix selects the API host.
    pub fn datacenter(&self) -> Option<&str> {
        self.api_key
            .rsplit_once('-')
            .map(|(_, dc)| dc)
            .filter(|dc| !dc.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub offer_provider: Provider,
    pub mailchimp: Option<MailchimpConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: non_empty("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: non_empty("JWT_ISSUER").unwrap_or_else(|| "loyaltea".into()),
            audience: non_empty("JWT_AUDIENCE").unwrap_or_else(|| "loyaltea-users".into()),
            ttl_minutes: match non_empty("JWT_TTL_MINUTES") {
                Some(raw) => parse_ttl_minutes(&raw)?,
                None => DEFAULT_TTL_MINUTES,
            },
        };

        let offer_provider = match non_empty("OFFER_PROVIDER") {
            Some(raw) => raw
                .parse::<Provider>()
                .with_context(|| format!("OFFER_PROVIDER={raw}"))?,
            None => Provider::Mailchimp,
        };

        let mailchimp = match (non_empty("MAILCHIMP_API_KEY"), non_empty("MAILCHIMP_LIST_ID")) {
            (Some(api_key), Some(list_id)) => Some(MailchimpConfig { api_key, list_id }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt,
            offer_provider,
            mailchimp,
        })
    }
}

fn parse_ttl_minutes(raw: &str) -> anyhow::Result<i64> {
    let minutes = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("JWT_TTL_MINUTES={raw} is not an integer"))?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES={minutes} must be between 1 and {MAX_TTL_MINUTES}");
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/loyaltea"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let cfg = load(&REQUIRED).expect("config loads");
        assert_eq!(cfg.jwt.issuer, "loyaltea");
        assert_eq!(cfg.jwt.audience, "loyaltea-users");
        assert_eq!(cfg.jwt.ttl_minutes, 1440);
        assert_eq!(cfg.offer_provider, Provider::Mailchimp);
        assert!(cfg.mailchimp.is_none());
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/x")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("OFFER_PROVIDER", "sendgrid"));
        assert!(load(&pairs).is_err());
    }

    #[test]
    fn mailchimp_needs_both_key_and_list() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("MAILCHIMP_API_KEY", "abc123-us21"));
        assert!(load(&pairs).expect("config loads").mailchimp.is_none());

        pairs.push(("MAILCHIMP_LIST_ID", "list1"));
        pairs.push(("OFFER_PROVIDER", "mailgun"));
        let cfg = load(&pairs).expect("config loads");
        let mc = cfg.mailchimp.expect("mailchimp configured");
        assert_eq!(mc.datacenter(), Some("us21"));
        assert_eq!(cfg.offer_provider, Provider::Mailgun);
    }

    #[test]
    fn ttl_outside_bounds_is_rejected() {
        let with_ttl = |ttl: &str| {
            let mut pairs = REQUIRED.to_vec();
            pairs.push(("JWT_TTL_MINUTES", ttl));
            load(&pairs)
        };

        assert_eq!(with_ttl("30").expect("config loads").jwt.ttl_minutes, 30);
        assert_eq!(
            with_ttl(&MAX_TTL_MINUTES.to_string()).expect("config loads").jwt.ttl_minutes,
            MAX_TTL_MINUTES
        );
        for bad in ["0", "-5", "100000000000", "soon"] {
            let err = with_ttl(bad).unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_MINUTES"), "{bad}: {err}");
        }
    }

    #[test]
    fn datacenter_requires_suffix() {
        let mc = MailchimpConfig {
            api_key: "nodash".into(),
            list_id: "l".into(),
        };
        assert_eq!(mc.datacenter(), None);
    }
}
