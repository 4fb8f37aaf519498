use std::env;

use serde::{Deserialize, Serialize};

fn default_timeout_seconds() -> u64 {
    30
}

/// Where the dictionary server lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host` or `host:port`. `None` falls back to the built-in default host.
    pub endpoint: Option<String>,
    /// Upper bound for connecting and for each server reply. 0 disables it.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    /// Override with `DICT_SERVER` and `DICT_TIMEOUT_SECONDS` when they are set.
    pub fn apply_env(&mut self) {
        self.apply_vars(&|key| env::var(key).ok());
    }

    pub fn apply_vars(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("DICT_SERVER").filter(|v| !v.trim().is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(timeout) = lookup("DICT_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.timeout_seconds = timeout;
        }
    }
}
