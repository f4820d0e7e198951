/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load Syn-Gather-Core configuration from TOML, providing the
    staging root and build service endpoints with sane defaults.

  Security / Safety Notes:
    Configuration values are operator-controlled paths and URLs;
    no secrets are read or stored by this module.

  Dependencies:
    toml + serde for parsing, dirs for the default config path.

  Operational Scope:
    Consumed once at startup; values are read-only for the rest
    of the run.

  Revision History:
    2025-06-17 COD  Authored configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults over hidden fallbacks
    - Operator overrides via CLI take precedence
    - Configuration failures surface before any staging work
============================================================*/

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SyngatherError};

const DEFAULT_WORKDIR: &str = "/var/tmp/syngather";
const DEFAULT_HUB_URL: &str = "https://koji.fedoraproject.org/kojihub";
const DEFAULT_DOWNLOAD_URL: &str = "https://kojipkgs.fedoraproject.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level Syn-Gather-Core configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyngatherConfig {
    /// Root directory under which per-run workspaces are created.
    pub workdir: PathBuf,
    pub koji: KojiConfig,
}

/// Build service endpoints and transport limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KojiConfig {
    /// Base URL of the build metadata service.
    pub hub_url: String,
    /// Base URL artifacts are downloaded from.
    pub download_url: String,
    /// Request timeout in seconds for lookups and downloads.
    pub timeout: u64,
}

impl Default for SyngatherConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from(DEFAULT_WORKDIR),
            koji: KojiConfig::default(),
        }
    }
}

impl Default for KojiConfig {
    fn default() -> Self {
        Self {
            hub_url: DEFAULT_HUB_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SyngatherConfig {
    /// Load configuration from an explicit path, the default location, or
    /// built-in defaults, in that order of preference.
    ///
    /// An explicit path must exist and parse; a missing default-location
    /// file is not an error.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        if let Some(explicit) = path {
            return Self::load_file(explicit);
        }

        if let Some(default_path) = Self::default_config_path() {
            if default_path.is_file() {
                return Self::load_file(&default_path);
            }
        }

        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            SyngatherError::Config(format!(
                "Failed to read config file {}: {err}",
                path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|err| {
            SyngatherError::Config(format!(
                "Failed to parse config file {}: {err}",
                path.display()
            ))
        })
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("syngather").join("config.toml"))
    }

    /// Directory session logs are written beneath.
    pub fn log_dir(&self) -> PathBuf {
        self.workdir.join("logs")
    }
}
