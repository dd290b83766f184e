//! In-memory collaborators for engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{Result, ScienceError};
use crate::identifiers::doi::{Doi, normalize};
use crate::resolver::DoiResolver;
use crate::sources::{CitationRegistry, MetadataService};
use crate::types::{Citation, CitationAuthor, Contributor, InstitutionalPublication, IssueDate};

#[derive(Default)]
pub(crate) struct FakeRegistry {
    pub citations: HashMap<String, Citation>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeRegistry {
    pub fn with(citations: impl IntoIterator<Item = (&'static str, Citation)>) -> Self {
        Self {
            citations: citations
                .into_iter()
                .map(|(doi, c)| (doi.to_string(), c))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CitationRegistry for FakeRegistry {
    fn name(&self) -> &str {
        "fake-registry"
    }

    async fn get_citation(&self, doi: &Doi) -> Result<Citation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScienceError::Registry("connection reset".to_string()));
        }
        self.citations
            .get(doi.as_str())
            .cloned()
            .ok_or_else(|| ScienceError::NotInRegistry(doi.to_string()))
    }
}

#[derive(Default)]
pub(crate) struct FakeService {
    pub publications: HashMap<String, Vec<InstitutionalPublication>>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeService {
    pub fn with(id: &str, pubs: Vec<InstitutionalPublication>) -> Self {
        let mut publications = HashMap::new();
        publications.insert(id.to_string(), pubs);
        Self {
            publications,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataService for FakeService {
    fn name(&self) -> &str {
        "fake-service"
    }

    async fn publications_by_external_id(&self, id: &str) -> Result<Vec<InstitutionalPublication>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScienceError::Service("timed out".to_string()));
        }
        Ok(self.publications.get(id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct FakeResolver {
    pub known: HashSet<String>,
}

impl FakeResolver {
    pub fn with(dois: &[&str]) -> Self {
        Self {
            known: dois.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[async_trait]
impl DoiResolver for FakeResolver {
    async fn resolves(&self, doi: &str) -> bool {
        self.known.contains(&normalize(doi))
    }
}

pub(crate) fn citation(title: &str) -> Citation {
    Citation {
        title: vec![title.to_string()],
        ..Default::default()
    }
}

pub(crate) fn full_citation(title: &str) -> Citation {
    Citation {
        title: vec![title.to_string()],
        abstract_text: "Registry abstract".to_string(),
        author: vec![CitationAuthor {
            given: "Grace".to_string(),
            family: "Hopper".to_string(),
            orcid: Some("http://orcid.org/0000-0002-1825-0097".to_string()),
            ..Default::default()
        }],
        container_title: vec!["Registry Journal".to_string()],
        publisher: "Registry Press".to_string(),
        issued: IssueDate {
            date_parts: vec![vec![Some(2021), Some(6)]],
        },
        ..Default::default()
    }
}

pub(crate) fn publication(title: &str, doi: &str) -> InstitutionalPublication {
    let mut p = InstitutionalPublication::default();
    p.attributes.title = title.to_string();
    if !doi.is_empty() {
        p.attributes.doi = Some(doi.to_string());
    }
    p
}

pub(crate) fn full_publication(title: &str, doi: &str) -> InstitutionalPublication {
    let mut p = publication(title, doi);
    p.attributes.abstract_text = Some("Service abstract".to_string());
    p.attributes.published_on = Some("2021-06-30".to_string());
    p.attributes.journal_title = Some("Service Journal".to_string());
    p.attributes.publisher = Some("Service Press".to_string());
    p.attributes.contributors = vec![Contributor {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        institutional_id: Some("aal1".to_string()),
        ..Default::default()
    }];
    p
}
