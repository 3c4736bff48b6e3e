//! vciso configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the plan service base URL
pub const API_URL_ENV: &str = "VCISO_API_URL";

/// Main vciso configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plan service connection
    pub api: ApiConfig,

    /// Export destinations and page geometry
    pub export: ExportConfig,

    /// Log level used when `--log-level` is not given
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .vciso.yml
        let local_config = PathBuf::from(".vciso.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/vciso/vciso.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("vciso").join("vciso.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// Takes the lookup as a closure so callers (and tests) decide where
    /// variables come from.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            tracing::debug!(%url, "Config::apply_env: base url from environment");
            self.api.base_url = url;
        }
    }

    /// Apply command-line overrides, which win over file and environment
    pub fn apply_cli(&mut self, api_url: Option<&str>) {
        if let Some(url) = api_url {
            tracing::debug!(%url, "Config::apply_cli: base url from command line");
            self.api.base_url = url.to_string();
        }
    }
}

/// Plan service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service base URL, without a trailing path
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            // Plan generation can take a while on the service side
            timeout_ms: 120_000,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Export destinations and page geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that receives exported PDFs and reports
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Character columns per PDF page
    #[serde(rename = "page-columns")]
    pub page_columns: usize,

    /// Text rows per PDF page
    #[serde(rename = "page-rows")]
    pub page_rows: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        // Use the XDG download directory when there is one
        let output_dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            output_dir,
            page_columns: 90,
            page_rows: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout(), Duration::from_secs(120));
        assert_eq!(config.export.page_columns, 90);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
api:
  base-url: https://plans.example.com
  timeout-ms: 5000

export:
  output-dir: /tmp/exports
  page-columns: 80
  page-rows: 50

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.api.base_url, "https://plans.example.com");
        assert_eq!(config.api.timeout_ms, 5000);
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(config.export.page_columns, 80);
        assert_eq!(config.export.page_rows, 50);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
api:
  base-url: http://10.0.0.5:8000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000");

        // Defaults for unspecified
        assert_eq!(config.api.timeout_ms, 120_000);
        assert_eq!(config.export.page_rows, 64);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base-url: http://from-file:9000").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.api.base_url, "http://from-file:9000");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/vciso.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_override_priority() {
        let mut config = Config::default();
        config.api.base_url = "http://from-file".to_string();

        config.apply_env(|key| (key == API_URL_ENV).then(|| "http://from-env".to_string()));
        assert_eq!(config.api.base_url, "http://from-env");

        config.apply_cli(Some("http://from-cli"));
        assert_eq!(config.api.base_url, "http://from-cli");

        // Absent overrides leave the value alone
        config.apply_env(|_| None);
        config.apply_cli(None);
        assert_eq!(config.api.base_url, "http://from-cli");
    }

    #[test]
    fn test_blank_env_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }
}
