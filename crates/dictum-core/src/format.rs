use dictum_config::FormatConfig;
use dictum_types::{
    DatabaseInfo, DatabaseSelector, Definition, MatchResult, StrategyInfo, StrategySelector,
};

use crate::collapse::should_collapse;
use crate::template::{
    DATABASE, DATABASES, DEFINITION, DESCRIPTION, HEADWORD, ID, MATCHES, PHRASE, STRATEGY, render,
};
use crate::truncate::truncate;

const NO_DEFINITION: &str = "No definition for <phrase> found in <database>.";
const COLLAPSED: &str = "Definitions for <phrase> found in: <databases>";
const NO_MATCH: &str = "Nothing matched <phrase> in <database> using <strategy>.";
const LISTING_ENTRY: &str = "<id>: <description>";
const NO_DATABASES: &str = "The server offers no databases.";
const NO_STRATEGIES: &str = "The server offers no strategies.";

/// Turns query results into reply text according to a [`FormatConfig`].
pub struct ResultFormatter<'a> {
    config: &'a FormatConfig,
}

impl<'a> ResultFormatter<'a> {
    pub fn new(config: &'a FormatConfig) -> Self {
        Self { config }
    }

    pub fn headword(&self, headword: &str) -> String {
        render(&self.config.headword_format, &[(HEADWORD, headword)])
    }

    pub fn database(&self, database: &str) -> String {
        render(&self.config.database_format, &[(DATABASE, database)])
    }

    /// Reply for a `define` lookup.
    pub fn definitions(
        &self,
        phrase: &str,
        database: &DatabaseSelector,
        definitions: &[Definition],
    ) -> String {
        if definitions.is_empty() {
            return render(
                NO_DEFINITION,
                &[
                    (PHRASE, self.headword(phrase).as_str()),
                    (DATABASE, self.database(&database.to_string()).as_str()),
                ],
            );
        }

        if should_collapse(definitions, self.config.max_defs_before_collapse) {
            tracing::debug!(
                "Collapsing {} definitions for '{}'",
                definitions.len(),
                phrase
            );
            return self.collapsed(phrase, definitions);
        }

        definitions
            .iter()
            .map(|def| self.definition(def))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn definition(&self, def: &Definition) -> String {
        let body = truncate(
            &def.body,
            self.config.max_length_per_def,
            &self.config.ellipsis,
            self.config.tail_fraction,
        );

        render(
            &self.config.definition_format,
            &[
                (HEADWORD, self.headword(&def.headword).as_str()),
                (DATABASE, self.database(&def.database).as_str()),
                (DEFINITION, body.as_str()),
            ],
        )
    }

    fn collapsed(&self, phrase: &str, definitions: &[Definition]) -> String {
        let mut databases: Vec<&str> = Vec::new();
        for def in definitions {
            if !databases.contains(&def.database.as_str()) {
                databases.push(&def.database);
            }
        }

        let databases = databases
            .iter()
            .map(|db| self.database(db))
            .collect::<Vec<_>>()
            .join(", ");

        render(
            COLLAPSED,
            &[(PHRASE, self.headword(phrase).as_str()), (DATABASES, databases.as_str())],
        )
    }

    /// Reply for a `match` lookup.
    pub fn matches(
        &self,
        phrase: &str,
        database: &DatabaseSelector,
        strategy: &StrategySelector,
        results: &[MatchResult],
    ) -> String {
        if results.is_empty() {
            return render(
                NO_MATCH,
                &[
                    (PHRASE, self.headword(phrase).as_str()),
                    (DATABASE, self.database(&database.to_string()).as_str()),
                    (STRATEGY, strategy.to_string().as_str()),
                ],
            );
        }

        results
            .iter()
            .map(|result| {
                let headwords = result
                    .headwords
                    .iter()
                    .map(|h| self.headword(h))
                    .collect::<Vec<_>>()
                    .join(", ");

                render(
                    &self.config.match_format,
                    &[
                        (DATABASE, self.database(&result.database).as_str()),
                        (MATCHES, headwords.as_str()),
                    ],
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn databases(&self, databases: &[DatabaseInfo]) -> String {
        if databases.is_empty() {
            return NO_DATABASES.to_string();
        }

        databases
            .iter()
            .map(|info| listing_entry(&self.database(&info.identifier), &info.description))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn strategies(&self, strategies: &[StrategyInfo]) -> String {
        if strategies.is_empty() {
            return NO_STRATEGIES.to_string();
        }

        strategies
            .iter()
            .map(|info| listing_entry(&info.identifier, &info.description))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn listing_entry(id: &str, description: &str) -> String {
    render(LISTING_ENTRY, &[(ID, id), (DESCRIPTION, description)])
}
