use std::env;

use dictum_types::TailSpec;
use serde::{Deserialize, Serialize};

fn default_headword_format() -> String {
    // IRC bold
    "\u{2}<headword>\u{2}".to_string()
}

fn default_database_format() -> String {
    "<database>".to_string()
}

fn default_definition_format() -> String {
    "<headword> (<database>): <definition>".to_string()
}

fn default_match_format() -> String {
    "<database>: <matches>".to_string()
}

fn default_max_defs_before_collapse() -> usize {
    4
}

fn default_max_length_per_def() -> usize {
    200
}

fn default_ellipsis() -> String {
    "...".to_string()
}

/// Reply templates and size limits. Read-only while a query runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    #[serde(default = "default_headword_format")]
    pub headword_format: String,
    #[serde(default = "default_database_format")]
    pub database_format: String,
    #[serde(default = "default_definition_format")]
    pub definition_format: String,
    #[serde(default = "default_match_format")]
    pub match_format: String,
    /// Collapse multi-database results once more than this many come back
    #[serde(default = "default_max_defs_before_collapse")]
    pub max_defs_before_collapse: usize,
    /// Displayed characters per definition body, ellipsis included
    #[serde(default = "default_max_length_per_def")]
    pub max_length_per_def: usize,
    #[serde(default = "default_ellipsis")]
    pub ellipsis: String,
    #[serde(default)]
    pub tail_fraction: TailSpec,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            headword_format: default_headword_format(),
            database_format: default_database_format(),
            definition_format: default_definition_format(),
            match_format: default_match_format(),
            max_defs_before_collapse: default_max_defs_before_collapse(),
            max_length_per_def: default_max_length_per_def(),
            ellipsis: default_ellipsis(),
            tail_fraction: TailSpec::default(),
        }
    }
}

impl FormatConfig {
    /// Override the size limits with `DICT_MAX_DEFS` and `DICT_MAX_LENGTH`.
    pub fn apply_env(&mut self) {
        self.apply_vars(&|key| env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with variables read through `lookup`.
    /// Unset or unparsable variables leave the current values alone.
    pub fn apply_vars(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(max_defs) = lookup("DICT_MAX_DEFS").and_then(|v| v.parse().ok()) {
            self.max_defs_before_collapse = max_defs;
        }
        if let Some(max_length) = lookup("DICT_MAX_LENGTH").and_then(|v| v.parse().ok()) {
            self.max_length_per_def = max_length;
        }
    }
}
