//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/famtree/famtree.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `FAMTREE_*` prefix

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::BirthYear;

/// Errors while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment override: {0}")]
    Environment(#[from] ConfigError),

    #[error("serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Layout used when drawing a subtree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DrawStyle {
    /// One line per person with box-drawing connectors
    #[default]
    Classic,
    /// termtree layout
    Termtree,
}

/// Rendering defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Print names only instead of `name (year) [id]`
    pub names_only: bool,
    pub style: DrawStyle,
}

/// Default limits for the age-gap queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgeGapConfig {
    pub younger_than: BirthYear,
    pub older_than: BirthYear,
}

impl Default for AgeGapConfig {
    fn default() -> Self {
        Self {
            younger_than: 18,
            older_than: 50,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified, inherit from the layer below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderConfig,
    pub age_gap: RawAgeGapConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub names_only: Option<bool>,
    pub style: Option<DrawStyle>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawAgeGapConfig {
    pub younger_than: Option<BirthYear>,
    pub older_than: Option<BirthYear>,
}

/// Unified configuration for famtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub age_gap: AgeGapConfig,
}

/// Get the XDG config directory for famtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "famtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("famtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// A missing global file is skipped; a missing explicit `config_file`
    /// is an error.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(global_config_path().as_deref(), config_file)
    }

    /// Same layering as [`Settings::load`] with an explicit global file.
    pub fn load_from(
        global_file: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_file {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            current = current.merge_with(&load_raw_settings(path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: RenderConfig {
                names_only: overlay.render.names_only.unwrap_or(self.render.names_only),
                style: overlay.render.style.unwrap_or(self.render.style),
            },
            age_gap: AgeGapConfig {
                younger_than: overlay
                    .age_gap
                    .younger_than
                    .unwrap_or(self.age_gap.younger_than),
                older_than: overlay
                    .age_gap
                    .older_than
                    .unwrap_or(self.age_gap.older_than),
            },
        }
    }

    /// Apply FAMTREE_* environment variables as explicit overrides.
    ///
    /// `FAMTREE_AGE_GAP__YOUNGER_THAN=21` sets `age_gap.younger_than`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        // without prefix_separator the prefix would also need `__`
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FAMTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        if let Ok(val) = config.get_bool("render.names_only") {
            settings.render.names_only = val;
        }
        if let Ok(val) = config.get::<DrawStyle>("render.style") {
            settings.render.style = val;
        }
        if let Ok(val) = config.get::<BirthYear>("age_gap.younger_than") {
            settings.age_gap.younger_than = val;
        }
        if let Ok(val) = config.get::<BirthYear>("age_gap.older_than") {
            settings.age_gap.older_than = val;
        }

        Ok(settings)
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
