use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Where the storage service listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// base_url = "http://localhost:8000"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base address of the weather storage service.
    pub base_url: Option<String>,
}

impl Config {
    /// Base URL to use, falling back to [`DEFAULT_BASE_URL`].
    pub fn service_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Validate and store a new base URL.
    pub fn set_base_url(&mut self, raw: &str) -> Result<()> {
        let url = parse_base_url(raw)?;
        self.base_url = Some(url.as_str().trim_end_matches('/').to_string());
        Ok(())
    }

    /// Return a copy with `base_url` replaced when an override is given.
    pub fn with_override(mut self, base_url: Option<&str>) -> Result<Self> {
        if let Some(raw) = base_url {
            self.set_base_url(raw)?;
        }
        Ok(self)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather-lookup")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Parse a storage service base address. Only absolute http(s) URLs that can
/// carry a path are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid base URL '{raw}'"))?;

    if !matches!(url.scheme(), "http" | "https") {
        bail!("Unsupported scheme '{}' in base URL '{raw}'. Use http or https.", url.scheme());
    }
    if url.cannot_be_a_base() {
        bail!("Base URL '{raw}' cannot be used as a base for lookups");
    }

    Ok(url)
}
