use serde::{Deserialize, Serialize};

// ─── Registry ────────────────────────────────────────────────────────────────

/// A work as described by the citation registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Citation {
    #[serde(rename = "DOI", default)]
    pub doi: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub author: Vec<CitationAuthor>,
    #[serde(default)]
    pub container_title: Vec<String>,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub language: String,
    #[serde(rename = "type", default)]
    pub work_type: String,
    #[serde(default)]
    pub issued: IssueDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationAuthor {
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub given: String,
    /// Display name; organisations often carry only this.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(rename = "ORCID", default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDate {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl Citation {
    /// Title fragments joined into one title.
    pub fn joined_title(&self) -> String {
        self.title.join(": ")
    }

    /// Issue date as `Y`, `Y-MM` or `Y-MM-DD`, from the first date-parts
    /// entry only. Missing components are never filled in.
    pub fn issued_date(&self) -> Option<String> {
        self.issued
            .date_parts
            .first()
            .and_then(|parts| format_date_parts(parts))
    }
}

/// Format `[year, month?, day?]`; a zero or missing year yields `None`.
pub fn format_date_parts(parts: &[Option<i32>]) -> Option<String> {
    let component = |i: usize| parts.get(i).copied().flatten().unwrap_or(0);
    let (year, month, day) = (component(0), component(1), component(2));
    if year == 0 {
        return None;
    }

    let mut date = year.to_string();
    if month != 0 {
        date.push_str(&format!("-{month:02}"));
        if day != 0 {
            date.push_str(&format!("-{day:02}"));
        }
    }
    Some(date)
}

// ─── Metadata service ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationsResponse {
    #[serde(default)]
    pub data: Vec<InstitutionalPublication>,
}

/// A publication record from the institutional metadata service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalPublication {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub attributes: PublicationAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationAttributes {
    pub title: String,
    pub secondary_title: Option<String>,
    pub journal_title: Option<String>,
    pub publication_type: Option<String>,
    pub publisher: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub doi: Option<String>,
    #[serde(rename = "preferred_open_access_url")]
    pub open_access_url: Option<String>,
    pub published_on: Option<String>,
    pub contributors: Vec<Contributor>,
    pub pure_ids: Vec<String>,
    pub activity_insight_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contributor {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(rename = "psu_user_id")]
    pub institutional_id: Option<String>,
}

impl InstitutionalPublication {
    /// `title`, or `title: secondary` when a secondary title is set.
    pub fn complete_title(&self) -> String {
        let attrs = &self.attributes;
        match attrs.secondary_title.as_deref() {
            Some(sub) if !sub.is_empty() => format!("{}: {}", attrs.title, sub),
            _ => attrs.title.clone(),
        }
    }

    /// Lowercased DOI, empty when the service has none.
    pub fn doi_lowercase(&self) -> String {
        self.attributes
            .doi
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
    }
}

impl Contributor {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
