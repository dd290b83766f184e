use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Root application configuration, loaded from `~/.config/oarecon/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub service: ServiceConfig,
    pub resolver: ResolverConfig,
    pub matching: MatchingConfig,
    pub batch: BatchConfig,
}

/// Citation registry (CrossRef-compatible) client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polite_email: Option<String>,
    pub min_interval_ms: u64,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

/// Institutional research-metadata service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub production_url: String,
    pub test_url: String,
    /// Use `production_url` instead of `test_url`.
    pub production: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub min_interval_ms: u64,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum normalized Levenshtein similarity for two titles to match.
    pub title_threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub ambiguous_doi: AmbiguousDoiPolicy,
}

/// What a batch run does when the metadata service disagrees with itself
/// about a subject's DOI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguousDoiPolicy {
    /// Log and move on to the next subject.
    #[default]
    Skip,
    /// Stop the batch so an operator can review the record.
    Fail,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.crossref.org".to_string(),
            polite_email: None,
            min_interval_ms: 100,
            max_retries: 3,
            timeout_secs: 30,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            production_url: "https://metadata.libraries.psu.edu".to_string(),
            test_url: "https://metadata-qa.libraries.psu.edu".to_string(),
            production: false,
            api_key: None,
            min_interval_ms: 250,
            max_retries: 3,
            timeout_secs: 30,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: "https://doi.org".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            title_threshold: 0.70,
        }
    }
}

impl ServiceConfig {
    /// Base URL for the active environment.
    pub fn base_url(&self) -> &str {
        if self.production {
            &self.production_url
        } else {
            &self.test_url
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/oarecon/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("OARECON_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("oarecon")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    ///
    /// `OARECON_SERVICE_API_KEY` overrides the key stored in the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&contents)?
        } else {
            Self::default()
        };

        if let Ok(key) = std::env::var("OARECON_SERVICE_API_KEY")
            && !key.is_empty()
        {
            config.service.api_key = Some(key);
        }
        config.check()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used.
    fn check(&self) -> Result<()> {
        let threshold = self.matching.title_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CoreError::ConfigError(format!(
                "matching.title_threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(())
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.registry.base_url, "https://api.crossref.org");
        assert_eq!(cfg.resolver.base_url, "https://doi.org");
        assert!((cfg.matching.title_threshold - 0.70).abs() < f64::EPSILON);
        assert_eq!(cfg.batch.ambiguous_doi, AmbiguousDoiPolicy::Skip);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.matching.title_threshold = 0.85;
        cfg.batch.ambiguous_doi = AmbiguousDoiPolicy::Fail;
        cfg.registry.polite_email = Some("oa@example.edu".to_string());
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!((loaded.matching.title_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(loaded.batch.ambiguous_doi, AmbiguousDoiPolicy::Fail);
        assert_eq!(loaded.registry.polite_email.as_deref(), Some("oa@example.edu"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[matching]\ntitle_threshold = 0.9\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!((loaded.matching.title_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(loaded.registry.max_retries, 3);
    }

    #[test]
    fn test_unusable_threshold_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        for value in ["nan", "1.5", "-0.1"] {
            std::fs::write(&path, format!("[matching]\ntitle_threshold = {value}\n")).unwrap();
            let err = AppConfig::load_from(&path).unwrap_err();
            assert!(matches!(err, CoreError::ConfigError(_)), "value: {value}");
        }
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg = AppConfig::load_from(Path::new("/tmp/nonexistent_oarecon_config.toml")).unwrap();
        assert_eq!(cfg.resolver.timeout_secs, 15);
    }

    #[test]
    fn test_service_base_url_follows_environment() {
        let mut svc = ServiceConfig::default();
        assert_eq!(svc.base_url(), svc.test_url);
        svc.production = true;
        assert_eq!(svc.base_url(), svc.production_url);
    }
}
