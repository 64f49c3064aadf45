//! Optional converter configuration, read from a TOML file.
//!
//! ```toml
//! exec_address = 16514
//! output_dir = "build"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::zx81::{ExecAddress, TapeError};

/// File looked for in the working directory when no config is given.
pub const DEFAULT_CONFIG_FILE: &str = "obj2p.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Exec address used when none is given on the command line
    pub exec_address: Option<u32>,
    /// Directory the .p file is written to
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, TapeError> {
        let config: Config = toml::from_str(text)?;
        // Surface a bad address at load time rather than at conversion
        config.exec_address()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TapeError> {
        let text = fs::read_to_string(path).map_err(|e| {
            TapeError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Config::from_toml_str(&text)
    }

    /// Load `path` if given, otherwise `obj2p.toml` in `dir` when it exists.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, TapeError> {
        match path {
            Some(path) => Config::load(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    log::debug!("Using config file {}", candidate.display());
                    Config::load(&candidate)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn exec_address(&self) -> Result<Option<ExecAddress>, TapeError> {
        self.exec_address.map(ExecAddress::try_from).transpose()
    }

    /// Where `file_name` should be written.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}
