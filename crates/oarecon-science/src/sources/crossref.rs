use std::time::Duration;

use async_trait::async_trait;
use oarecon_core::config::RegistryConfig;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::error::{Result, ScienceError};
use crate::http::{RateLimitedClient, USER_AGENT};
use crate::identifiers::doi::Doi;
use crate::sources::CitationRegistry;
use crate::types::Citation;

/// `{"status":"ok","message-type":"work","message":{...}}`
#[derive(Debug, Deserialize)]
struct WorkEnvelope {
    #[serde(default)]
    status: String,
    message: Option<Citation>,
}

pub struct CrossRefRegistry {
    client: RateLimitedClient,
    base_url: String,
}

impl CrossRefRegistry {
    pub fn new(polite_email: Option<String>) -> Result<Self> {
        Self::from_config(&RegistryConfig {
            polite_email,
            ..RegistryConfig::default()
        })
    }

    pub fn from_config(cfg: &RegistryConfig) -> Result<Self> {
        Self::with_params(
            &cfg.base_url,
            Duration::from_millis(cfg.min_interval_ms),
            cfg.max_retries,
            Duration::from_secs(cfg.timeout_secs),
            cfg.polite_email.as_deref(),
        )
    }

    pub fn with_params(
        base_url: &str,
        min_interval: Duration,
        max_retries: u32,
        timeout: Duration,
        polite_email: Option<&str>,
    ) -> Result<Self> {
        // Registered emails are routed to the registry's "polite" pool.
        let user_agent = match polite_email {
            Some(email) => format!("{USER_AGENT} (mailto:{email})"),
            None => USER_AGENT.to_string(),
        };
        let client = RateLimitedClient::new(min_interval, max_retries, timeout, &user_agent)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_by_doi(&self, doi: &Doi) -> Result<Citation> {
        let url = format!("{}/works/{}", self.base_url, doi);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let (status, body) = self
            .client
            .fetch(&url, headers)
            .await
            .map_err(ScienceError::registry)?;
        match status {
            200..=299 => {}
            404 => return Err(ScienceError::NotInRegistry(doi.to_string())),
            _ => return Err(ScienceError::Registry(format!("HTTP {status}: {body}"))),
        }

        let envelope: WorkEnvelope = serde_json::from_str(&body)
            .map_err(|e| ScienceError::Registry(format!("decoding work {doi}: {e}")))?;

        tracing::debug!(%doi, status = %envelope.status, "registry work fetched");
        envelope
            .message
            .ok_or_else(|| ScienceError::Registry(format!("empty response for {doi}")))
    }
}

#[async_trait]
impl CitationRegistry for CrossRefRegistry {
    fn name(&self) -> &str {
        "CrossRef"
    }

    async fn get_citation(&self, doi: &Doi) -> Result<Citation> {
        self.fetch_by_doi(doi).await
    }
}
