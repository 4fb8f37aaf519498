use std::fmt;

use serde::{Deserialize, Serialize};

/// Database selector used when the caller names no database.
pub const ALL_DATABASES: DatabaseSelector = DatabaseSelector::All;

/// Strategy selector used when the caller names no strategy.
pub const DEFAULT_STRATEGY: StrategySelector = StrategySelector::Default;

/// A single definition returned by the dictionary server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub headword: String,
    pub body: String,
    pub database: String,
}

impl Definition {
    pub fn new(
        headword: impl Into<String>,
        body: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            headword: headword.into(),
            body: body.into(),
            database: database.into(),
        }
    }

    /// Build a definition from the raw text block sent by the server.
    ///
    /// The first line only echoes the headword and is dropped. The remaining
    /// lines are joined and every whitespace run becomes a single space.
    pub fn from_source(
        headword: impl Into<String>,
        database: impl Into<String>,
        raw: &str,
    ) -> Self {
        let body = raw
            .lines()
            .skip(1)
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");

        Self::new(headword, body, database)
    }
}

/// Headwords matched in one database. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub database: String,
    pub headwords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub identifier: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub identifier: String,
    pub description: String,
}

/// Which database(s) a lookup runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseSelector {
    /// Every database on the server (`*`).
    All,
    /// Stop at the first database with a hit (`!`).
    First,
    Named(String),
}

impl DatabaseSelector {
    /// Token sent on the wire.
    pub fn wire(&self) -> &str {
        match self {
            DatabaseSelector::All => "*",
            DatabaseSelector::First => "!",
            DatabaseSelector::Named(name) => name,
        }
    }
}

impl From<&str> for DatabaseSelector {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == "*" || value.eq_ignore_ascii_case("all") {
            DatabaseSelector::All
        } else if value == "!" || value.eq_ignore_ascii_case("first") {
            DatabaseSelector::First
        } else {
            DatabaseSelector::Named(value.to_string())
        }
    }
}

impl fmt::Display for DatabaseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseSelector::All => f.write_str("ALL"),
            DatabaseSelector::First => f.write_str("FIRST"),
            DatabaseSelector::Named(name) => f.write_str(name),
        }
    }
}

/// Matching algorithm for `match` lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategySelector {
    /// Server's default strategy (`.`).
    Default,
    Named(String),
}

impl StrategySelector {
    pub fn wire(&self) -> &str {
        match self {
            StrategySelector::Default => ".",
            StrategySelector::Named(name) => name,
        }
    }
}

impl From<&str> for StrategySelector {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == "." || value.eq_ignore_ascii_case("default") {
            StrategySelector::Default
        } else {
            StrategySelector::Named(value.to_string())
        }
    }
}

impl fmt::Display for StrategySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategySelector::Default => f.write_str("default"),
            StrategySelector::Named(name) => f.write_str(name),
        }
    }
}

/// How much of the tail survives when text is elided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TailSpec {
    /// Exact number of trailing characters to keep.
    Chars(usize),
    /// Share of the remaining budget given to the tail, rounded up.
    Ratio(f64),
}

impl Default for TailSpec {
    fn default() -> Self {
        TailSpec::Chars(0)
    }
}
