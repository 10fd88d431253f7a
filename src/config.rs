//! External tool locations and stream sizing.
//!
//! Defaults work out of the box: `xzcat` and `unzip` are looked up on `PATH`.
//! With the `config` feature enabled the values can be overridden from
//! `<config_dir>/anyfile/config.toml`:
//!
//! ```toml
//! xzcat = "/usr/bin/xzcat"
//! unzip = "/usr/local/bin/unzip"
//! buffer_size = 131072
//! ```

use std::path::PathBuf;

#[cfg(feature = "config")]
use crate::error::{AnyfileError, Result};
#[cfg(feature = "config")]
use std::path::Path;

/// Buffer size for readers returned by the open entry points
pub const DEFAULT_BUFFER_SIZE: usize = 20 * 4096;

/// Where external decompressors live and how large read buffers are
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default, deny_unknown_fields))]
pub struct ToolConfig {
    /// Program that writes a decompressed `.xz` file to stdout
    pub xzcat: PathBuf,
    /// `unzip` binary, invoked with `-Z1` and `-p`
    pub unzip: PathBuf,
    /// Capacity of the buffered reader
    pub buffer_size: usize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            xzcat: PathBuf::from("xzcat"),
            unzip: PathBuf::from("unzip"),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

#[cfg(feature = "config")]
impl ToolConfig {
    const FILE_NAME: &'static str = "config.toml";

    /// Path of the user configuration file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("anyfile").join(Self::FILE_NAME))
    }

    /// Load the user configuration, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnyfileError::file_error(format!("Failed to read config: {}", path.display()), e)
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded tool config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| AnyfileError::config(e.to_string()))?;
        if config.buffer_size == 0 {
            return Err(AnyfileError::config("buffer_size must be positive"));
        }
        Ok(config)
    }
}
