use oarecon_core::{DepositMetadata, TaskRecord};

use crate::confirm::{DoiDerivation, derive_doi};
use crate::enrichment::merge::{
    fill_from_citation, fill_from_publications, seed_from_record, with_identifier,
};
use crate::error::{Result, ScienceError};
use crate::identifiers::doi::{Doi, normalize};
use crate::sources::{CitationRegistry, MetadataService};
use crate::types::InstitutionalPublication;

/// Assembles deposit metadata from the local record, the registry and the
/// metadata service, in that order of precedence.
pub struct DepositBuilder<'a> {
    registry: &'a dyn CitationRegistry,
    service: &'a dyn MetadataService,
}

impl<'a> DepositBuilder<'a> {
    pub fn new(registry: &'a dyn CitationRegistry, service: &'a dyn MetadataService) -> Self {
        Self { registry, service }
    }

    /// Build and validate the deposit record for `record`.
    ///
    /// `confirmed_doi` takes precedence over the record's own DOI. When
    /// neither is usable, a DOI is derived from the service publications for
    /// the record's external id, unless they disagree.
    pub async fn build_deposit_metadata(
        &self,
        record: &TaskRecord,
        confirmed_doi: Option<&str>,
    ) -> Result<DepositMetadata> {
        let mut pubs: Option<Vec<InstitutionalPublication>> = None;
        let mut meta = seed_from_record(record);

        let mut doi = normalize(confirmed_doi.unwrap_or_default());
        if doi.is_empty() {
            doi = normalize(record.doi.as_deref().unwrap_or_default());
        }
        if doi.is_empty()
            && let Some(id) = external_id(record)
        {
            let fetched = self.fetch_publications(id).await?;
            match derive_doi(&fetched) {
                DoiDerivation::Single(d) => {
                    doi = normalize(&d);
                    pubs = Some(fetched);
                }
                DoiDerivation::None => pubs = Some(fetched),
                // None of the disagreeing publications can be trusted as a fallback.
                DoiDerivation::Ambiguous(candidates) => {
                    tracing::warn!(record = record.label(), ?candidates, "ambiguous service DOIs");
                    pubs = Some(Vec::new());
                }
            }
        }

        if doi.is_empty() {
            tracing::debug!(record = record.label(), "no DOI, skipping registry");
        } else {
            let parsed = Doi::parse(&doi)?;
            let citation = self
                .registry
                .get_citation(&parsed)
                .await
                .map_err(ScienceError::registry)?;
            meta = with_identifier(meta, &doi);
            meta = fill_from_citation(meta, &citation);
        }

        if meta.needs_fallback() {
            match (pubs.as_deref(), external_id(record)) {
                (Some(fetched), _) => meta = fill_from_publications(meta, fetched, &doi),
                (None, Some(id)) => {
                    let fetched = self.fetch_publications(id).await?;
                    meta = fill_from_publications(meta, &fetched, &doi);
                }
                (None, None) => {
                    tracing::debug!(record = record.label(), "no external id, skipping service fallback");
                }
            }
        }

        if let Some(field) = meta.missing_field() {
            return Err(ScienceError::IncompleteMetadata { field });
        }
        tracing::info!(record = record.label(), %doi, "deposit metadata assembled");
        Ok(meta)
    }

    async fn fetch_publications(&self, id: &str) -> Result<Vec<InstitutionalPublication>> {
        self.service
            .publications_by_external_id(id)
            .await
            .map_err(ScienceError::service)
    }
}

fn external_id(record: &TaskRecord) -> Option<&str> {
    record.external_id.as_deref().filter(|id| !id.is_empty())
}
