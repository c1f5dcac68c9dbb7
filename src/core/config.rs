//! Configuration file management.
//!
//! Reads optional `.reseal.toml` settings for the key service. Every field
//! may also come from the environment, which wins over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Settings read from `.reseal.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Key service settings
    #[serde(default)]
    pub kms: KmsConfig,
}

/// `[kms]` section.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KmsConfig {
    /// Default key used for values that have none yet.
    ///
    /// Any identifier the service accepts: key ID, key ARN or alias.
    #[serde(default)]
    pub key_id: Option<String>,
    /// Region override for the service client
    #[serde(default)]
    pub region: Option<String>,
}

impl Config {
    /// Load configuration using the process environment.
    ///
    /// # Arguments
    ///
    /// * `explicit` - Path given on the command line, if any
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if an explicitly named file cannot be
    /// read, or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |name| std::env::var(name).ok())
    }

    /// Load configuration with a custom environment lookup.
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::locate(explicit, &env) {
            Some(path) => Self::from_file(&path)?,
            None => {
                debug!("no config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env(&env);
        Ok(config)
    }

    /// Find the config file to read.
    ///
    /// An explicit path or `$RESEAL_CONFIG` is returned as-is so that a
    /// missing file is reported. The project and user files are only
    /// returned when they exist.
    pub fn locate<F>(explicit: Option<&Path>, env: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(path) = env(constants::CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }

        let project = PathBuf::from(constants::CONFIG_FILE);
        if project.is_file() {
            return Some(project);
        }
        dirs::config_dir()
            .map(|dir| dir.join(constants::CONFIG_DIR).join("config.toml"))
            .filter(|path| path.is_file())
    }

    /// Read and parse a single config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        debug!(
            key_id = config.kms.key_id.is_some(),
            region = config.kms.region.is_some(),
            "config loaded"
        );
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key_id) = env(constants::KEY_ID_ENV).filter(|v| !v.is_empty()) {
            debug!("key id taken from environment");
            self.kms.key_id = Some(key_id);
        }
        if let Some(region) = env(constants::REGION_ENV).filter(|v| !v.is_empty()) {
            self.kms.region = Some(region);
        }
    }

    /// The configured default key, if any.
    pub fn key_id(&self) -> Option<&str> {
        self.kms.key_id.as_deref()
    }

    /// The configured region, if any.
    pub fn region(&self) -> Option<&str> {
        self.kms.region.as_deref()
    }
}
