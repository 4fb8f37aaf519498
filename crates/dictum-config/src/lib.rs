use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::format::FormatConfig;
pub use self::server::ServerConfig;

pub mod format;
pub mod server;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    InvalidFormat(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub format: FormatConfig,
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        self.apply_vars(&|key| env::var(key).ok());
    }

    pub fn apply_vars(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        self.server.apply_vars(lookup);
        self.format.apply_vars(lookup);
    }

    /// Load a config file the user asked for by name.
    ///
    /// Precedence is defaults, then the file, then environment variables.
    /// Fields absent from the file keep their defaults. A missing file is
    /// reported and treated as empty.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, true, &|key| env::var(key).ok())
    }

    /// Like [`load`](Self::load) for a conventional location that may
    /// legitimately be absent.
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, false, &|key| env::var(key).ok())
    }

    fn load_with(
        path: &Path,
        explicit: bool,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            tracing::info!("Loading config from {}", path.display());
            let file = File::open(path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            if explicit {
                tracing::warn!("Config file {} not found, using defaults", path.display());
            } else {
                tracing::debug!("No config file at {}, using defaults", path.display());
            }
            Self::default()
        };

        config.apply_vars(lookup);
        Ok(config)
    }
}
