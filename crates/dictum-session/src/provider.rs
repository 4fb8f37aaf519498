use async_trait::async_trait;
use dictum_types::{DatabaseInfo, Definition, MatchResult, StrategyInfo};

use crate::error::ProviderError;

/// Opens sessions against a dictionary server.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: DictSession;

    async fn connect(&self, host: &str, port: u16) -> Result<Self::Session, ProviderError>;
}

/// A live connection to a dictionary server.
///
/// Owned by one operation at a time and released through [`disconnect`].
///
/// [`disconnect`]: DictSession::disconnect
#[async_trait]
pub trait DictSession: Send {
    /// Look up `phrase` in `database`. No match is an empty list, not an error.
    async fn define(
        &mut self,
        database: &str,
        phrase: &str,
    ) -> Result<Vec<Definition>, ProviderError>;

    /// Find headwords matching `phrase` with `strategy`, grouped per database.
    async fn match_words(
        &mut self,
        database: &str,
        strategy: &str,
        phrase: &str,
    ) -> Result<Vec<MatchResult>, ProviderError>;

    async fn databases(&mut self) -> Result<Vec<DatabaseInfo>, ProviderError>;

    async fn strategies(&mut self) -> Result<Vec<StrategyInfo>, ProviderError>;

    async fn disconnect(&mut self) -> Result<(), ProviderError>;
}
