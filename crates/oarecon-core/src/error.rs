use thiserror::Error;

/// All errors that can occur in oarecon-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Field `{field}` has unexpected type: expected {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Process exit codes used by the CLI.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    Mismatch = 4,
    Incomplete = 5,
    NetworkError = 6,
}

pub type Result<T> = std::result::Result<T, CoreError>;
