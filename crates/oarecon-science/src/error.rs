use std::fmt;

use oarecon_core::{CoreError, RequiredField};
use thiserror::Error;

/// Which source produced a conflicting title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    Registry,
    Service,
}

impl fmt::Display for TitleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => f.write_str("registry"),
            Self::Service => f.write_str("service"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScienceError {
    #[error("malformed DOI: {0:?}")]
    MalformedDoi(String),

    #[error("DOI does not resolve: {0}")]
    UnresolvableDoi(String),

    #[error("registry error: {0}")]
    Registry(String),

    /// The DOI resolves but the registry has no record of it, as with DOIs
    /// minted by other registration agencies.
    #[error("DOI not in registry: {0}")]
    NotInRegistry(String),

    #[error("metadata service error: {0}")]
    Service(String),

    #[error("title mismatch (source={origin}): expected={expected:?}, got={got:?}")]
    TitleMismatch {
        expected: String,
        got: String,
        origin: TitleSource,
    },

    #[error("ambiguous DOI, sources disagree: {}", candidates.join(", "))]
    AmbiguousDoi { candidates: Vec<String> },

    #[error("no DOI found for {0}")]
    NoDoiFound(String),

    #[error("incomplete metadata: missing {field}")]
    IncompleteMetadata { field: RequiredField },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    ApiError(String, String),

    #[error("rate limit from {0}, retry after {1}s")]
    RateLimit(String, u64),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ScienceError {
    /// Errors that concern one subject only and must never abort a batch.
    pub fn is_subject_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedDoi(_)
                | Self::UnresolvableDoi(_)
                | Self::NotInRegistry(_)
                | Self::TitleMismatch { .. }
                | Self::AmbiguousDoi { .. }
                | Self::NoDoiFound(_)
                | Self::IncompleteMetadata { .. }
                | Self::Core(CoreError::FieldType { .. })
        )
    }

    /// Wrap a client failure as a registry error.
    pub fn registry(err: Self) -> Self {
        match err {
            Self::Registry(_) | Self::NotInRegistry(_) => err,
            other => Self::Registry(other.to_string()),
        }
    }

    /// Wrap a client failure as a metadata service error.
    pub fn service(err: Self) -> Self {
        match err {
            Self::Service(_) => err,
            other => Self::Service(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScienceError>;
