//! Fill-if-empty merge steps. Each step takes the metadata by value and
//! returns it, so the precedence order lives in one place: the caller's
//! sequence of steps.

use oarecon_core::{Creator, DepositMetadata, TaskRecord, rights_uri};

use crate::types::{Citation, CitationAuthor, Contributor, InstitutionalPublication};

/// Seed every field the local record already has.
pub fn seed_from_record(record: &TaskRecord) -> DepositMetadata {
    let text = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
    DepositMetadata {
        title: text(&record.title),
        description: text(&record.abstract_text),
        published_date: text(&record.published_date),
        embargo: text(&record.embargo),
        publisher_statement: text(&record.publisher_statement),
        rights: rights_uri(record.license.as_deref().unwrap_or_default()).to_string(),
        ..Default::default()
    }
}

/// Record the DOI in the identifier list.
pub fn with_identifier(mut meta: DepositMetadata, doi: &str) -> DepositMetadata {
    if !doi.is_empty() && !meta.identifiers.iter().any(|id| id == doi) {
        meta.identifiers.push(doi.to_string());
    }
    meta
}

/// Fill empty fields from the registry's citation.
pub fn fill_from_citation(mut meta: DepositMetadata, citation: &Citation) -> DepositMetadata {
    if meta.published_date.is_empty()
        && let Some(date) = citation.issued_date()
    {
        meta.published_date = date;
    }
    if meta.description.is_empty() {
        meta.description = citation.abstract_text.trim().to_string();
    }
    if meta.creators.is_empty() {
        meta.creators = creators_from_registry(&citation.author);
    }
    if meta.publisher.is_empty() && !citation.publisher.is_empty() {
        meta.publisher = vec![citation.publisher.clone()];
    }
    if meta.source.is_empty() {
        meta.source = citation
            .container_title
            .iter()
            .filter(|t| !t.is_empty())
            .cloned()
            .collect();
    }
    meta
}

/// Fill empty fields from the first service publication whose DOI ends with
/// `doi` (case-insensitive). An empty `doi` matches the first publication.
pub fn fill_from_publications(
    mut meta: DepositMetadata,
    pubs: &[InstitutionalPublication],
    doi: &str,
) -> DepositMetadata {
    let doi = doi.to_lowercase();
    let Some(publication) = pubs.iter().find(|p| p.doi_lowercase().ends_with(&doi)) else {
        return meta;
    };
    let attrs = &publication.attributes;
    let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    if meta.description.is_empty()
        && let Some(abstract_text) = present(&attrs.abstract_text)
    {
        meta.description = abstract_text;
    }
    if meta.published_date.is_empty()
        && let Some(published_on) = present(&attrs.published_on)
    {
        meta.published_date = published_on;
    }
    if meta.creators.is_empty() {
        meta.creators = creators_from_service(&attrs.contributors);
    }
    if meta.source.is_empty()
        && let Some(journal) = present(&attrs.journal_title)
    {
        meta.source = vec![journal];
    }
    if meta.publisher.is_empty()
        && let Some(publisher) = present(&attrs.publisher)
    {
        meta.publisher = vec![publisher];
    }
    meta
}

/// Registry authors as creators. Authors with neither a family name nor a
/// display name are dropped.
pub fn creators_from_registry(authors: &[CitationAuthor]) -> Vec<Creator> {
    authors
        .iter()
        .filter(|a| !a.family.is_empty() || !a.name.is_empty())
        .map(|a| {
            let name = if a.name.is_empty() {
                format!("{} {}", a.given, a.family).trim().to_string()
            } else {
                a.name.clone()
            };
            Creator {
                name,
                institutional_id: None,
                orcid: a.orcid.clone(),
            }
        })
        .collect()
}

pub fn creators_from_service(contributors: &[Contributor]) -> Vec<Creator> {
    contributors
        .iter()
        .map(|c| Creator {
            name: c.display_name(),
            institutional_id: c.institutional_id.clone().filter(|id| !id.is_empty()),
            orcid: None,
        })
        .collect()
}
