//! Configuration management for the job application form

use crate::error::{JobFormError, Result};
use crate::input::text_extractor::DEFAULT_PAGE_MARKER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const API_BASE_ENV: &str = "JOBFORM_API_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub draft: DraftConfig,
    pub api: ApiConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftConfig {
    pub autosave_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub mode: SubmitMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    Json,
    Multipart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub page_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub download_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("jobform");

        let download_dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            storage: StorageConfig {
                path: data_dir.join("storage.json"),
            },
            draft: DraftConfig {
                autosave_delay_ms: 2000,
            },
            api: ApiConfig {
                base_url: String::new(),
                endpoint: "/api/create_job".to_string(),
                timeout_secs: 120,
                mode: SubmitMode::Json,
            },
            extraction: ExtractionConfig {
                page_marker: DEFAULT_PAGE_MARKER.to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                download_dir,
            },
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobFormError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobFormError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("jobform")
            .join("config.toml")
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.draft.autosave_delay_ms)
    }

    /// Base URL after applying the environment override. Falls back to
    /// the local development backend when nothing is configured.
    pub fn api_base_url(&self) -> String {
        let configured = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.api.base_url.clone());

        if configured.trim().is_empty() {
            "http://localhost:5000".to_string()
        } else {
            configured.trim().trim_end_matches('/').to_string()
        }
    }

    pub fn submission_url(&self) -> String {
        let endpoint = self.api.endpoint.trim();
        if endpoint.starts_with('/') {
            format!("{}{}", self.api_base_url(), endpoint)
        } else {
            format!("{}/{}", self.api_base_url(), endpoint)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(JobFormError::Configuration(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.extraction.page_marker.contains('\n') {
            return Err(JobFormError::Configuration(
                "extraction.page_marker must be a single line".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(config.draft.autosave_delay_ms, 2000);
        assert_eq!(config.autosave_delay(), Duration::from_secs(2));
        assert_eq!(config.api.mode, SubmitMode::Json);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.api.mode = SubmitMode::Multipart;
        config.draft.autosave_delay_ms = 500;
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.api.mode, SubmitMode::Multipart);
        assert_eq!(loaded.draft.autosave_delay_ms, 500);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        config.save_to(&path).unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(JobFormError::Configuration(_))));

        std::fs::write(&path, "storage = 3").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_submission_url() {
        let mut config = Config::default();
        config.api.base_url = "https://jobs.example.com/".to_string();
        config.api.endpoint = "api/create_job".to_string();

        // Only meaningful when the override is unset in the test environment
        if std::env::var(API_BASE_ENV).is_err() {
            assert_eq!(config.submission_url(), "https://jobs.example.com/api/create_job");
        }
    }
}
