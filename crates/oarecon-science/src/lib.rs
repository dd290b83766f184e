//! oarecon science: DOI normalization, title matching, identity confirmation
//! and deposit metadata reconciliation across the registry and the metadata
//! service.

pub mod batch;
pub mod confirm;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod identifiers;
pub mod matching;
pub mod resolver;
pub mod sources;
pub mod types;

#[cfg(test)]
mod testing;

pub use batch::{BatchOutcome, BatchReport, BatchRunner};
pub use confirm::{DoiDerivation, IdentityConfirmer, derive_doi};
pub use enrichment::DepositBuilder;
pub use error::{Result, ScienceError, TitleSource};
pub use identifiers::doi::{Doi, normalize};
pub use matching::{TitleMatcher, similar};
pub use resolver::{DoiResolver, HttpDoiResolver};
pub use sources::{CitationRegistry, MetadataService};
pub use types::{Citation, CitationAuthor, Contributor, InstitutionalPublication};
