use async_trait::async_trait;

use crate::error::Result;
use crate::identifiers::doi::Doi;
use crate::types::{Citation, InstitutionalPublication};

pub mod crossref;
pub mod rmd;

pub use crossref::CrossRefRegistry;
pub use rmd::RmdService;

/// Global citation registry keyed by DOI.
#[async_trait]
pub trait CitationRegistry: Send + Sync {
    fn name(&self) -> &str;

    async fn get_citation(&self, doi: &Doi) -> Result<Citation>;
}

/// Institutional metadata service keyed by external-system identifiers.
#[async_trait]
pub trait MetadataService: Send + Sync {
    fn name(&self) -> &str;

    async fn publications_by_external_id(&self, id: &str) -> Result<Vec<InstitutionalPublication>>;
}
