use dictum_config::FormatConfig;
use dictum_core::ResultFormatter;
use dictum_session::{DictSession, FailureKind, SessionError, SessionManager, SessionProvider};
use dictum_types::{ALL_DATABASES, DEFAULT_STRATEGY, DatabaseSelector, StrategySelector};

use crate::sink::ReplySink;

const CONNECTION_FAILED: &str = "Sorry, I could not reach the dictionary server.";
const PROTOCOL_FAILED: &str = "Sorry, the dictionary server could not answer that request.";
const GENERIC_FAILED: &str = "Sorry, something went wrong while looking that up.";
const EMPTY_PHRASE: &str = "Give me a word or phrase to look up.";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Empty phrase")]
    EmptyPhrase,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl CommandError {
    /// Fixed, non-technical text shown to the person who asked.
    pub fn user_message(&self) -> &'static str {
        match self {
            CommandError::EmptyPhrase => EMPTY_PHRASE,
            CommandError::Session(e) => match e.kind() {
                FailureKind::Connection => CONNECTION_FAILED,
                FailureKind::Protocol => PROTOCOL_FAILED,
                FailureKind::Generic => GENERIC_FAILED,
            },
        }
    }
}

/// Entry points for the four dictionary commands.
///
/// Each command opens its own session, so one instance can serve many
/// concurrent invocations.
pub struct CommandHandlers<P> {
    sessions: SessionManager<P>,
    endpoint: Option<String>,
}

impl<P: SessionProvider> CommandHandlers<P> {
    pub fn new(provider: P, endpoint: Option<String>) -> Self {
        Self {
            sessions: SessionManager::new(provider),
            endpoint,
        }
    }

    pub fn provider(&self) -> &P {
        self.sessions.provider()
    }

    /// `define <phrase> [from <database>]`
    pub async fn define(
        &self,
        config: &FormatConfig,
        phrase: &str,
        database: Option<DatabaseSelector>,
        sink: &dyn ReplySink,
    ) {
        let reply = self.try_define(config, phrase, database).await;
        respond(reply, sink).await;
    }

    pub async fn try_define(
        &self,
        config: &FormatConfig,
        phrase: &str,
        database: Option<DatabaseSelector>,
    ) -> Result<String, CommandError> {
        let phrase = validate_phrase(phrase)?;
        let database = database.unwrap_or(ALL_DATABASES);
        tracing::info!("define '{phrase}' from {database}");

        let (db, word) = (database.wire().to_string(), phrase.to_string());
        let definitions = self
            .sessions
            .with_session(self.endpoint.as_deref(), move |s| {
                Box::pin(async move { s.define(&db, &word).await })
            })
            .await?;

        Ok(ResultFormatter::new(config).definitions(phrase, &database, &definitions))
    }

    /// `match <phrase> [using <strategy>] [from <database>]`
    pub async fn match_words(
        &self,
        config: &FormatConfig,
        phrase: &str,
        strategy: Option<StrategySelector>,
        database: Option<DatabaseSelector>,
        sink: &dyn ReplySink,
    ) {
        let reply = self.try_match_words(config, phrase, strategy, database).await;
        respond(reply, sink).await;
    }

    pub async fn try_match_words(
        &self,
        config: &FormatConfig,
        phrase: &str,
        strategy: Option<StrategySelector>,
        database: Option<DatabaseSelector>,
    ) -> Result<String, CommandError> {
        let phrase = validate_phrase(phrase)?;
        let strategy = strategy.unwrap_or(DEFAULT_STRATEGY);
        let database = database.unwrap_or(ALL_DATABASES);
        tracing::info!("match '{phrase}' using {strategy} from {database}");

        let (db, strat, word) = (
            database.wire().to_string(),
            strategy.wire().to_string(),
            phrase.to_string(),
        );
        let results = self
            .sessions
            .with_session(self.endpoint.as_deref(), move |s| {
                Box::pin(async move { s.match_words(&db, &strat, &word).await })
            })
            .await?;

        Ok(ResultFormatter::new(config).matches(phrase, &database, &strategy, &results))
    }

    /// `list databases`
    pub async fn list_databases(&self, config: &FormatConfig, sink: &dyn ReplySink) {
        let reply = self.try_list_databases(config).await;
        respond(reply, sink).await;
    }

    pub async fn try_list_databases(&self, config: &FormatConfig) -> Result<String, CommandError> {
        tracing::info!("list databases");
        let databases = self
            .sessions
            .with_session(self.endpoint.as_deref(), |s| {
                Box::pin(async move { s.databases().await })
            })
            .await?;

        Ok(ResultFormatter::new(config).databases(&databases))
    }

    /// `list strategies`
    pub async fn list_strategies(&self, config: &FormatConfig, sink: &dyn ReplySink) {
        let reply = self.try_list_strategies(config).await;
        respond(reply, sink).await;
    }

    pub async fn try_list_strategies(
        &self,
        config: &FormatConfig,
    ) -> Result<String, CommandError> {
        tracing::info!("list strategies");
        let strategies = self
            .sessions
            .with_session(self.endpoint.as_deref(), |s| {
                Box::pin(async move { s.strategies().await })
            })
            .await?;

        Ok(ResultFormatter::new(config).strategies(&strategies))
    }
}

fn validate_phrase(phrase: &str) -> Result<&str, CommandError> {
    let phrase = phrase.trim();
    if phrase.is_empty() {
        return Err(CommandError::EmptyPhrase);
    }
    Ok(phrase)
}

async fn respond(reply: Result<String, CommandError>, sink: &dyn ReplySink) {
    let text = match reply {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Command failed: {e}");
            e.user_message().to_string()
        }
    };
    sink.reply(text).await;
}
