use std::fmt;

use serde::{Deserialize, Serialize};

/// A single creator attached to a deposit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "display_name")]
    pub name: String,

    /// Institutional user id, when the creator came from the metadata service.
    #[serde(rename = "psu_id", default, skip_serializing_if = "Option::is_none")]
    pub institutional_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

impl Creator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Deposit-ready metadata, serialized with the repository's field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositMetadata {
    pub work_type: String,
    pub visibility: String,
    pub title: String,
    pub description: String,
    pub creators: Vec<Creator>,
    pub rights: String,
    pub published_date: String,

    #[serde(rename = "embargoed_until", default, skip_serializing_if = "String::is_empty")]
    pub embargo: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher_statement: String,
    #[serde(rename = "identifier", default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publisher: Vec<String>,
}

impl Default for DepositMetadata {
    fn default() -> Self {
        Self {
            work_type: "article".to_string(),
            visibility: "open".to_string(),
            title: String::new(),
            description: String::new(),
            creators: Vec::new(),
            rights: String::new(),
            published_date: String::new(),
            embargo: String::new(),
            publisher_statement: String::new(),
            identifiers: Vec::new(),
            source: Vec::new(),
            publisher: Vec::new(),
        }
    }
}

/// Fields that must be present before a deposit is usable, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Description,
    PublishedDate,
    Rights,
    Creators,
}

impl RequiredField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::PublishedDate => "published_date",
            Self::Rights => "rights",
            Self::Creators => "creators",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DepositMetadata {
    /// First required field that is still empty.
    pub fn missing_field(&self) -> Option<RequiredField> {
        if self.title.is_empty() {
            Some(RequiredField::Title)
        } else if self.description.is_empty() {
            Some(RequiredField::Description)
        } else if self.published_date.is_empty() {
            Some(RequiredField::PublishedDate)
        } else if self.rights.is_empty() {
            Some(RequiredField::Rights)
        } else if self.creators.is_empty() {
            Some(RequiredField::Creators)
        } else {
            None
        }
    }

    /// Whether any field the fallback sources can still supply is empty.
    pub fn needs_fallback(&self) -> bool {
        self.description.is_empty() || self.published_date.is_empty() || self.creators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> DepositMetadata {
        DepositMetadata {
            title: "T".to_string(),
            description: "D".to_string(),
            published_date: "2020".to_string(),
            rights: "https://creativecommons.org/licenses/by/4.0/".to_string(),
            creators: vec![Creator::new("Ada Lovelace")],
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_validates() {
        assert_eq!(complete().missing_field(), None);
        assert!(!complete().needs_fallback());
    }

    #[test]
    fn test_missing_field_check_order() {
        let mut meta = complete();
        meta.creators.clear();
        meta.rights.clear();
        assert_eq!(meta.missing_field(), Some(RequiredField::Rights));

        meta.description.clear();
        assert_eq!(meta.missing_field(), Some(RequiredField::Description));
    }

    #[test]
    fn test_serializes_repository_field_names() {
        let mut meta = complete();
        meta.creators[0].orcid = Some("https://orcid.org/0000-0001".to_string());
        meta.identifiers = vec!["10.1000/xyz".to_string()];
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["work_type"], "article");
        assert_eq!(json["creators"][0]["display_name"], "Ada Lovelace");
        assert_eq!(json["creators"][0]["orcid"], "https://orcid.org/0000-0001");
        assert!(json["creators"][0].get("psu_id").is_none());
        assert_eq!(json["identifier"][0], "10.1000/xyz");
        assert!(json.get("embargoed_until").is_none());
        assert!(json.get("publisher").is_none());
    }
}
