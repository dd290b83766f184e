use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;

use crate::error::Result;
use crate::http::USER_AGENT;
use crate::identifiers::doi::normalize;

/// Answers whether a DOI is registered with the resolution service.
///
/// Never fails: any lookup problem is reported as "does not resolve" so a
/// batch run is not aborted by a flaky resolver.
#[async_trait]
pub trait DoiResolver: Send + Sync {
    async fn resolves(&self, doi: &str) -> bool;
}

/// Resolver backed by `https://doi.org`, which answers registered DOIs with a
/// `302` redirect to the landing page.
pub struct HttpDoiResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDoiResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url("https://doi.org", timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DoiResolver for HttpDoiResolver {
    async fn resolves(&self, doi: &str) -> bool {
        let doi = normalize(doi);
        if doi.is_empty() {
            return false;
        }
        let url = format!("{}/{}", self.base_url, doi);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().as_u16() == 302,
            Err(e) => {
                tracing::debug!(%doi, error = %e, "DOI lookup failed");
                false
            }
        }
    }
}
