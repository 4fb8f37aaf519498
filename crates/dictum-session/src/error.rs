/// Failures reported by a session provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server replied {code}: {message}")]
    Protocol { code: u16, message: String },

    #[error("Malformed reply: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connection,
    Protocol,
    Generic,
}

/// A classified failure of one session round trip.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Could not open a session: {0}")]
    Connection(#[source] ProviderError),

    #[error("Server rejected the request: {0}")]
    Protocol(#[source] ProviderError),

    #[error("Unexpected failure: {0}")]
    Generic(#[source] ProviderError),
}

impl SessionError {
    /// Classify a failure raised while an operation was running.
    pub fn from_operation(error: ProviderError) -> Self {
        match error {
            ProviderError::Protocol { .. } | ProviderError::Malformed(_) => {
                SessionError::Protocol(error)
            }
            _ => SessionError::Generic(error),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            SessionError::Connection(_) => FailureKind::Connection,
            SessionError::Protocol(_) => FailureKind::Protocol,
            SessionError::Generic(_) => FailureKind::Generic,
        }
    }
}
