//! Identity confirmation: decide whether a DOI really belongs to the article
//! a local record describes.
//!
//! A DOI given by the record is checked against the registry (path A). When
//! the record has none, one is derived from the metadata service's
//! publications for the record's external id, checked against the service
//! title, and then checked against the registry as well (path B).

use crate::error::{Result, ScienceError, TitleSource};
use crate::identifiers::doi::{Doi, normalize};
use crate::matching::TitleMatcher;
use crate::resolver::DoiResolver;
use crate::sources::{CitationRegistry, MetadataService};
use crate::types::InstitutionalPublication;

/// DOI derived from a set of service publications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoiDerivation {
    None,
    Single(String),
    /// The publications disagree; the distinct values in first-seen order.
    Ambiguous(Vec<String>),
}

/// Reconcile the DOIs of every publication returned for one subject.
///
/// All lowercased values must agree. A publication without a DOI counts as
/// a disagreeing empty value.
pub fn derive_doi(pubs: &[InstitutionalPublication]) -> DoiDerivation {
    let dois: Vec<String> = pubs.iter().map(InstitutionalPublication::doi_lowercase).collect();
    let Some((first, rest)) = dois.split_first() else {
        return DoiDerivation::None;
    };

    if rest.iter().any(|d| d != first) {
        let mut distinct: Vec<String> = Vec::new();
        for d in &dois {
            if !distinct.contains(d) {
                distinct.push(d.clone());
            }
        }
        tracing::debug!(dois = ?dois, "service publications disagree on DOI");
        return DoiDerivation::Ambiguous(distinct);
    }

    if first.is_empty() {
        DoiDerivation::None
    } else {
        DoiDerivation::Single(first.clone())
    }
}

pub struct IdentityConfirmer<'a> {
    registry: &'a dyn CitationRegistry,
    service: &'a dyn MetadataService,
    resolver: &'a dyn DoiResolver,
    matcher: TitleMatcher,
}

impl<'a> IdentityConfirmer<'a> {
    pub fn new(
        registry: &'a dyn CitationRegistry,
        service: &'a dyn MetadataService,
        resolver: &'a dyn DoiResolver,
    ) -> Self {
        Self {
            registry,
            service,
            resolver,
            matcher: TitleMatcher::default(),
        }
    }

    pub fn with_matcher(mut self, matcher: TitleMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Confirm the DOI for a subject.
    ///
    /// A candidate DOI that normalizes to nothing is treated as absent.
    pub async fn confirm_identity(
        &self,
        subject_title: &str,
        candidate_doi: Option<&str>,
        external_id: Option<&str>,
    ) -> Result<Doi> {
        let candidate = normalize(candidate_doi.unwrap_or_default());
        if candidate.is_empty() {
            self.confirm_via_service(subject_title, external_id).await
        } else {
            self.confirm_doi(subject_title, &candidate).await
        }
    }

    /// Path A: the DOI must resolve and the registry title must match.
    pub async fn confirm_doi(&self, subject_title: &str, doi: &str) -> Result<Doi> {
        let doi = Doi::parse(doi)?;
        if !self.resolver.resolves(doi.as_str()).await {
            return Err(ScienceError::UnresolvableDoi(doi.to_string()));
        }

        let citation = self
            .registry
            .get_citation(&doi)
            .await
            .map_err(ScienceError::registry)?;
        let registry_title = citation.joined_title();
        if !self.matcher.similar(subject_title, &registry_title) {
            return Err(ScienceError::TitleMismatch {
                expected: subject_title.to_string(),
                got: registry_title,
                origin: TitleSource::Registry,
            });
        }

        tracing::info!(%doi, registry = self.registry.name(), "DOI confirmed");
        Ok(doi)
    }

    /// Path B: derive a DOI from the metadata service, then confirm it
    /// against the registry too.
    pub async fn confirm_via_service(
        &self,
        subject_title: &str,
        external_id: Option<&str>,
    ) -> Result<Doi> {
        let Some(external_id) = external_id.filter(|id| !id.is_empty()) else {
            return Err(ScienceError::NoDoiFound("record without external id".to_string()));
        };

        let pubs = self
            .service
            .publications_by_external_id(external_id)
            .await
            .map_err(ScienceError::service)?;

        let derived = match derive_doi(&pubs) {
            DoiDerivation::Single(doi) => doi,
            DoiDerivation::None => return Err(ScienceError::NoDoiFound(external_id.to_string())),
            DoiDerivation::Ambiguous(candidates) => {
                return Err(ScienceError::AmbiguousDoi { candidates });
            }
        };
        let doi = normalize(&derived);
        if doi.is_empty() {
            return Err(ScienceError::MalformedDoi(derived));
        }

        if let Some(first) = pubs.first() {
            let service_title = first.complete_title();
            if !self.matcher.similar(subject_title, &service_title) {
                return Err(ScienceError::TitleMismatch {
                    expected: subject_title.to_string(),
                    got: service_title,
                    origin: TitleSource::Service,
                });
            }
        }

        tracing::debug!(external_id, %doi, service = self.service.name(), "DOI derived from service");
        self.confirm_doi(subject_title, &doi).await
    }
}
