/*============================================================
  Synavera Project: Apti
  Module: apti::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load operator preferences (columns, colors, confirmation
    behaviour) from the Apti TOML configuration file.

  Security / Safety Notes:
    Reads a user-owned file only; unknown keys are rejected to
    surface typos early.

  Dependencies:
    serde + toml for decoding, dirs for XDG path discovery.

  Operational Scope:
    Loaded once at start-up and shared read-only by the
    renderer and the command runner.

  Revision History:
    2025-11-12 COD  Authored configuration layer for Apti.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Defaults for every field; a missing file is not an error
    - Explicit error messages naming the offending path
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AptiError, Result};
use crate::palette::ColorsConfig;

/// Spacing used between rendered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpacesConfig {
    /// Gap between table columns.
    pub columns: usize,
    /// Gap between a size figure and its unit.
    pub unit: usize,
    /// Width reserved for package names in search listings.
    pub search: usize,
}

impl Default for SpacesConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            unit: 1,
            search: 40,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AptiConfig {
    pub display_size: bool,
    pub no_confirm: bool,
    pub log_dir: Option<PathBuf>,
    pub spaces: SpacesConfig,
    pub colors: ColorsConfig,
}

impl Default for AptiConfig {
    fn default() -> Self {
        Self {
            display_size: true,
            no_confirm: false,
            log_dir: None,
            spaces: SpacesConfig::default(),
            colors: ColorsConfig::default(),
        }
    }
}

impl AptiConfig {
    /// Default location: `$XDG_CONFIG_HOME/apti/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("apti").join("config.toml"))
    }

    /// Load from an explicit path, or the default path when none is given.
    ///
    /// An explicit path must exist; the default path may be absent.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            AptiError::Config(format!("Failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml(&raw)
            .map_err(|err| AptiError::Config(format!("{}: {err}", path.display())))
    }

    fn from_toml(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Directory for session logs, when the operator asked for them.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}
