//! Host configuration used to resolve the native [`ApplicationContext`].

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use platform_host::{ApplicationContext, ContextError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application id used when the config does not name one.
pub const DEFAULT_APP_ID: &str = "app";

#[derive(Debug, Error)]
/// Failure to load a [`HostConfig`] file.
pub enum HostConfigError {
    /// The config file could not be read.
    #[error("failed to read host config {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid TOML for [`HostConfig`].
    #[error("failed to parse host config {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Native host settings.
///
/// ```toml
/// app_id = "com.example.notes"
/// data_dir = "/var/lib/notes"
/// ```
pub struct HostConfig {
    /// Stable application identifier.
    pub app_id: String,
    /// Private data root. Defaults to the platform data dir joined with `app_id`.
    pub data_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            data_dir: None,
        }
    }
}

impl HostConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when `raw` is malformed or has unknown keys.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`HostConfigError`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HostConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| HostConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| HostConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the configured data dir, or the platform default for `app_id`.
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(&self.app_id)))
    }

    /// Builds the application context described by this config.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Unavailable`] when `app_id` is blank or no data dir resolves.
    pub fn application_context(&self) -> Result<ApplicationContext, ContextError> {
        if self.app_id.trim().is_empty() {
            return Err(ContextError::Unavailable(
                "host config app_id must not be empty".to_string(),
            ));
        }
        let data_dir = self.resolve_data_dir().ok_or_else(|| {
            ContextError::Unavailable("no platform data directory available".to_string())
        })?;
        Ok(ApplicationContext::new(self.app_id.clone(), data_dir))
    }
}
