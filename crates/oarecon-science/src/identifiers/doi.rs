use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScienceError};

static DOI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"10\.\d{4,9}/[-._;()/:a-z0-9]+").expect("valid DOI pattern"));

/// A canonical DOI: lowercase, no scheme, prefix, whitespace or escapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Doi(String);

impl Doi {
    /// Recover the canonical DOI from free text.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = normalize(input);
        if normalized.is_empty() {
            return Err(ScienceError::MalformedDoi(input.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolver URL for this DOI.
    pub fn url(&self) -> String {
        format!("https://doi.org/{}", self.0)
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Doi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Doi {
    type Error = ScienceError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Doi> for String {
    fn from(doi: Doi) -> Self {
        doi.0
    }
}

/// Extract the canonical DOI from `raw`, or return an empty string.
///
/// The input is query-unescaped first (falling back to the raw text when it
/// is not valid UTF-8 after decoding), then lowercased, then searched for the
/// leftmost DOI-shaped substring. Idempotent on canonical DOIs.
pub fn normalize(raw: &str) -> String {
    let lowered = query_unescape(raw).to_lowercase();
    DOI_REGEX
        .find(&lowered)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Every distinct DOI in `text`, in order of first appearance.
pub fn extract_dois_from_text(text: &str) -> Vec<Doi> {
    let lowered = query_unescape(text).to_lowercase();

    let mut dois: Vec<Doi> = Vec::new();
    for m in DOI_REGEX.find_iter(&lowered) {
        let doi = Doi(m.as_str().to_string());
        if !dois.contains(&doi) {
            dois.push(doi);
        }
    }
    dois
}

/// `+` as space, then percent escapes. Undecodable input is kept as is.
fn query_unescape(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(s) => s.into_owned(),
        Err(_) => raw.to_string(),
    }
}
