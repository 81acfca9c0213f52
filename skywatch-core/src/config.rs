use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{metno, nominatim, source::SourceId, wmo};

pub const DEFAULT_USER_AGENT: &str = concat!("skywatch/", env!("CARGO_PKG_VERSION"));

/// MET Norway endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetNoConfig {
    pub base_url: String,
}

impl Default for MetNoConfig {
    fn default() -> Self {
        Self {
            base_url: metno::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Nominatim place search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Preferred language for place names, e.g. `nb` or `en`.
    pub language: Option<String>,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: nominatim::DEFAULT_BASE_URL.to_string(),
            language: None,
        }
    }
}

/// WMO severe weather endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmoConfig {
    pub base_url: String,
    /// Region used by `skywatch alerts` when none is given.
    pub default_region: Option<String>,
}

impl Default for WmoConfig {
    fn default() -> Self {
        Self {
            base_url: wmo::DEFAULT_BASE_URL.to_string(),
            default_region: None,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// user_agent = "skywatch/0.1 ops@example.org"
/// timeout_secs = 20
///
/// [metno]
/// base_url = "https://api.met.no/"
///
/// [nominatim]
/// base_url = "https://nominatim.openstreetmap.org/"
/// language = "nb"
///
/// [wmo]
/// base_url = "https://severeweather.wmo.int/"
/// default_region = "europe"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sent with every request. MET Norway asks for contact details in it.
    pub user_agent: String,

    /// Whole-request timeout; no timeout when unset.
    pub timeout_secs: Option<u64>,

    pub metno: MetNoConfig,
    pub nominatim: NominatimConfig,
    pub wmo: WmoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            metno: MetNoConfig::default(),
            nominatim: NominatimConfig::default(),
            wmo: WmoConfig::default(),
        }
    }
}

impl Config {
    pub fn base_url(&self, id: SourceId) -> &str {
        match id {
            SourceId::MetNo => &self.metno.base_url,
            SourceId::Nominatim => &self.nominatim.base_url,
            SourceId::WmoSevereWeather => &self.wmo.base_url,
        }
    }

    pub fn set_base_url(&mut self, id: SourceId, base_url: String) {
        match id {
            SourceId::MetNo => self.metno.base_url = base_url,
            SourceId::Nominatim => self.nominatim.base_url = base_url,
            SourceId::WmoSevereWeather => self.wmo.base_url = base_url,
        }
    }

    /// Return the configured default alert region.
    pub fn default_region(&self) -> Result<&str> {
        self.wmo
            .default_region
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No region given and no default region configured.\n\
                     Hint: pass a region (e.g. `skywatch alerts europe`) or run `skywatch configure wmo`."
                )
            })
    }

    pub fn set_default_region(&mut self, region: Option<String>) {
        self.wmo.default_region = region.filter(|r| !r.trim().is_empty());
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build the HTTP client shared by all sources.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }

        builder.build().context("Failed to build HTTP client")
    }

    /// Load the user's config, or defaults on first run.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        let cfg = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Save to the user's config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skywatch", "skywatch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
