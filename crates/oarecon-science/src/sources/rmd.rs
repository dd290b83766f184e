use std::time::Duration;

use async_trait::async_trait;
use oarecon_core::config::ServiceConfig;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::error::{Result, ScienceError};
use crate::http::{RateLimitedClient, USER_AGENT};
use crate::sources::MetadataService;
use crate::types::{InstitutionalPublication, PublicationsResponse};

/// Error body returned by the service on non-200 responses.
#[derive(Debug, Deserialize)]
struct ServerError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Client for the institutional research-metadata service.
pub struct RmdService {
    client: RateLimitedClient,
    api_key: Option<String>,
    base_url: String,
}

impl RmdService {
    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        Self::with_params(
            cfg.base_url(),
            Duration::from_millis(cfg.min_interval_ms),
            cfg.max_retries,
            Duration::from_secs(cfg.timeout_secs),
            cfg.api_key.clone(),
        )
    }

    pub fn with_params(
        base_url: &str,
        min_interval: Duration,
        max_retries: u32,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = RateLimitedClient::new(min_interval, max_retries, timeout, USER_AGENT)?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key
            && let Ok(val) = HeaderValue::from_str(key)
        {
            headers.insert("X-API-Key", val);
        }
        headers
    }

    async fn publications(&self, filter: &str, value: &str) -> Result<Vec<InstitutionalPublication>> {
        let url = format!(
            "{}/v1/publications?{}={}",
            self.base_url,
            filter,
            urlencoding::encode(value)
        );
        let (status, body) = self
            .client
            .fetch(&url, self.headers())
            .await
            .map_err(ScienceError::service)?;

        if status != 200 {
            let msg = match serde_json::from_str::<ServerError>(&body) {
                Ok(e) => format!("server error: {} [{}]", e.message, e.code),
                Err(_) => format!("HTTP {status}: {body}"),
            };
            return Err(ScienceError::Service(msg));
        }

        let resp: PublicationsResponse = serde_json::from_str(&body)
            .map_err(|e| ScienceError::Service(format!("decoding publications: {e}")))?;
        tracing::debug!(filter, value, count = resp.data.len(), "service publications fetched");
        Ok(resp.data)
    }

    /// Publications linked to an activity-insight record.
    pub async fn publications_by_activity_id(&self, id: &str) -> Result<Vec<InstitutionalPublication>> {
        self.publications("activity_insight_id", id).await
    }

    pub async fn publications_by_doi(&self, doi: &str) -> Result<Vec<InstitutionalPublication>> {
        self.publications("doi", doi).await
    }
}

#[async_trait]
impl MetadataService for RmdService {
    fn name(&self) -> &str {
        "RMD"
    }

    async fn publications_by_external_id(&self, id: &str) -> Result<Vec<InstitutionalPublication>> {
        self.publications_by_activity_id(id).await
    }
}
