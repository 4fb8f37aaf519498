use std::time::Duration;

use async_trait::async_trait;
use dictum_session::{ProviderError, SessionProvider};
use tokio::net::TcpStream;

use crate::client::DictConnection;

const CLIENT_NAME: &str = concat!("dictum ", env!("CARGO_PKG_VERSION"));

/// Opens DICT sessions over TCP.
#[derive(Debug, Clone)]
pub struct DictProvider {
    timeout: Option<Duration>,
}

impl DictProvider {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Bound the connect and every reply by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl Default for DictProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionProvider for DictProvider {
    type Session = DictConnection<TcpStream>;

    async fn connect(&self, host: &str, port: u16) -> Result<Self::Session, ProviderError> {
        let connect = TcpStream::connect((host, port));
        let stream = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, connect)
                .await
                .map_err(|_| ProviderError::Connection(format!("{host}:{port}: timed out")))?,
            None => connect.await,
        }
        .map_err(|e| ProviderError::Connection(format!("{host}:{port}: {e}")))?;

        tracing::debug!("Connected to {host}:{port}");
        DictConnection::handshake(stream, CLIENT_NAME, self.timeout).await
    }
}
