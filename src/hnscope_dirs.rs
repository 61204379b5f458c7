//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate locations.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | Data (tags, thumbnails) | `~/Library/Application Support/hnscope/` | `~/.local/share/hnscope/` |
//! | Config | `~/Library/Application Support/hnscope/` | `~/.config/hnscope/` |
//!
//! # Environment Overrides
//!
//! - `HNSCOPE_DATA_DIR` overrides [`data_dir`]
//! - `HNSCOPE_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Persistent data root: the key-value store lives here.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("HNSCOPE_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("hnscope"))
        .unwrap_or_else(|| PathBuf::from("/tmp/hnscope-data"))
}

/// Config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("HNSCOPE_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("hnscope"))
        .unwrap_or_else(|| PathBuf::from("/tmp/hnscope-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
