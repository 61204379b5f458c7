//! Configuration file for hnscope.

use hnscope_search::{SearchConfig, ThumbnailConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search API settings.
    pub search: SearchConfig,
    /// Proxy fetch, favicon fallback, and cache bound.
    pub thumbnails: ThumbnailConfig,
    /// Where tags and thumbnails are persisted.
    pub storage: StorageConfig,
}

/// Persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store directory. `None` uses [`crate::hnscope_dirs::data_dir`].
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The effective store directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::hnscope_dirs::data_dir)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Render as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Write the default configuration to `path`.
    ///
    /// An existing file is left alone unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the file exists and `force` is not
    /// set, or an I/O error if it cannot be written.
    pub fn init_file(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(AppError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        let config = Self::default();
        config.save_to_file(path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first section's validation error.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        self.thumbnails.validate()?;
        Ok(())
    }
}
