use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Column names used by the local record store.
pub mod columns {
    pub const ID: &str = "ID";
    pub const EXTERNAL_ID: &str = "AI_ID";
    pub const TITLE: &str = "Title";
    pub const ABSTRACT: &str = "Abstract";
    pub const PUBLICATION_DATE: &str = "Publication_Date";
    pub const EMBARGO: &str = "Embargo_End";
    pub const STATEMENT: &str = "Set_Statement";
    pub const LICENSE: &str = "License";
    pub const DOI: &str = "DOI";
    pub const DOI_CONFIRMED: &str = "DOI_Confirmed";
    pub const STATUS: &str = "Status";
    pub const PERMISSIONS: &str = "Permissions";
    pub const DEPOSITOR: &str = "User";
}

/// A locally maintained task record, typed at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Identifier linking this record to the metadata service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher_statement: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(default)]
    pub doi_confirmed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depositor: Option<String>,
}

impl TaskRecord {
    /// Convert a record-store field bag into a typed record.
    ///
    /// Missing and `null` columns become `None`. Any other type mismatch is
    /// an error rather than a silent empty value.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            id: string_field(fields, columns::ID)?,
            external_id: single_string_field(fields, columns::EXTERNAL_ID)?,
            title: string_field(fields, columns::TITLE)?,
            abstract_text: string_field(fields, columns::ABSTRACT)?,
            published_date: string_field(fields, columns::PUBLICATION_DATE)?,
            embargo: string_field(fields, columns::EMBARGO)?,
            publisher_statement: string_field(fields, columns::STATEMENT)?,
            license: string_field(fields, columns::LICENSE)?,
            doi: string_field(fields, columns::DOI)?,
            doi_confirmed: bool_field(fields, columns::DOI_CONFIRMED)?,
            status: string_field(fields, columns::STATUS)?,
            permissions: string_field(fields, columns::PERMISSIONS)?,
            depositor: string_field(fields, columns::DEPOSITOR)?,
        })
    }

    /// Parse a JSON object of record-store columns.
    pub fn from_json(value: &Value) -> Result<Self> {
        let fields = value.as_object().ok_or_else(|| CoreError::FieldType {
            field: "<record>".to_string(),
            expected: "object",
        })?;
        Self::from_fields(fields)
    }

    /// Title or the empty string.
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Short label for log lines: the record id, else the external id.
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.external_id.as_deref())
            .unwrap_or("<unknown>")
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CoreError::FieldType {
            field: name.to_string(),
            expected: "string",
        }),
    }
}

/// Linked-record columns arrive either as a plain string or as a
/// one-element array of strings.
fn single_string_field(fields: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => Ok(None),
            [Value::String(s)] => Ok(Some(s.clone())),
            _ => Err(CoreError::FieldType {
                field: name.to_string(),
                expected: "single linked record",
            }),
        },
        Some(_) => Err(CoreError::FieldType {
            field: name.to_string(),
            expected: "string or single-element array",
        }),
    }
}

fn bool_field(fields: &Map<String, Value>, name: &str) -> Result<bool> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(CoreError::FieldType {
            field: name.to_string(),
            expected: "boolean",
        }),
    }
}
