use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::endpoint::Endpoint;
use crate::error::{ProviderError, SessionError};
use crate::provider::{DictSession, SessionProvider};

/// Lifecycle of a single round trip, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Open,
    Operating,
    Closing,
    Failed,
}

/// Runs one operation per session and always releases the session afterwards.
pub struct SessionManager<P> {
    provider: P,
}

impl<P: SessionProvider> SessionManager<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Open a session to `endpoint`, run `operation` on it and close it.
    ///
    /// The session is released exactly once whether the operation succeeds,
    /// fails or panics. A failed release is logged and never replaces the
    /// operation's own outcome.
    pub async fn with_session<T, F>(
        &self,
        endpoint: Option<&str>,
        operation: F,
    ) -> Result<T, SessionError>
    where
        F: for<'s> FnOnce(&'s mut P::Session) -> BoxFuture<'s, Result<T, ProviderError>>,
    {
        let endpoint = Endpoint::resolve(endpoint).map_err(|e| {
            tracing::warn!("Bad dictionary server address: {e}");
            log_state(SessionState::Failed);
            log_state(SessionState::Idle);
            SessionError::Connection(e)
        })?;

        log_state(SessionState::Connecting);
        tracing::debug!("Connecting to {endpoint}");
        let mut session = match self.provider.connect(&endpoint.host, endpoint.port).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Could not connect to {endpoint}: {e}");
                log_state(SessionState::Failed);
                log_state(SessionState::Idle);
                return Err(SessionError::Connection(e));
            }
        };
        log_state(SessionState::Open);

        log_state(SessionState::Operating);
        let outcome = AssertUnwindSafe(operation(&mut session))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!("Operation against {endpoint} failed: {e}");
                Err(SessionError::from_operation(e))
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                tracing::error!("Operation against {endpoint} panicked: {message}");
                Err(SessionError::Generic(ProviderError::Other(format!(
                    "operation panicked: {message}"
                ))))
            }
        };
        if result.is_err() {
            log_state(SessionState::Failed);
        }

        log_state(SessionState::Closing);
        if let Err(e) = session.disconnect().await {
            tracing::warn!("Failed to release session to {endpoint}: {e}");
        }
        log_state(SessionState::Idle);

        result
    }
}

fn log_state(state: SessionState) {
    tracing::debug!(?state, "session");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
