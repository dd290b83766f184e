//! oarecon core: typed task records, deposit metadata, configuration.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AmbiguousDoiPolicy, AppConfig};
pub use error::{CoreError, ExitCode, Result};
pub use models::*;
