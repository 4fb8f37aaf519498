mod endpoint;
mod error;
mod manager;
mod provider;

pub use endpoint::{DEFAULT_HOST, DEFAULT_PORT, Endpoint};
pub use error::{FailureKind, ProviderError, SessionError};
pub use manager::{SessionManager, SessionState};
pub use provider::{DictSession, SessionProvider};
