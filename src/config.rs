use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::api::http::DEFAULT_CHUNK_SIZE;
use crate::core::filter::DEFAULT_PAGE_SIZE;

/// Environment variable overriding [`ApiConfig::base_url`].
pub const API_URL_ENV: &str = "DOCUVAULT_API_URL";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub library: LibraryConfig,
}

/// Documents backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root; document endpoints live under `{base_url}documents/`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Upload body chunk size, which is also the progress granularity.
    pub upload_chunk_bytes: usize,
}

/// Collection view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Documents per page. Zero is treated as one.
    pub page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout_secs: 60,
            upload_chunk_bytes: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/docuvault/config.toml`, then apply
    /// environment overrides. Returns defaults if the file is missing or
    /// unparseable.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::config_path());
        config.apply_env_overrides(std::env::var(API_URL_ENV).ok());
        config
    }

    /// Load from an explicit file, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn apply_env_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            log::debug!("{API_URL_ENV} overrides api.base_url");
            self.api.base_url = url.trim().to_string();
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("docuvault").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
