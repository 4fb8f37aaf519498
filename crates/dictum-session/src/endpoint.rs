use std::fmt;

use crate::error::ProviderError;

pub const DEFAULT_HOST: &str = "dict.org";
pub const DEFAULT_PORT: u16 = 2628;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Resolve a configured `host[:port]` into a concrete endpoint.
    ///
    /// Accepts an optional `dict://` prefix and bracketed IPv6 literals.
    /// Missing pieces fall back to [`DEFAULT_HOST`] and [`DEFAULT_PORT`].
    pub fn resolve(configured: Option<&str>) -> Result<Self, ProviderError> {
        let raw = configured.map(str::trim).unwrap_or_default();
        let raw = raw.strip_prefix("dict://").unwrap_or(raw);
        let raw = raw.trim_end_matches('/');

        let (host, port) = if let Some(rest) = raw.strip_prefix('[') {
            let (host, rest) = rest
                .split_once(']')
                .ok_or_else(|| ProviderError::Connection(format!("invalid endpoint: {raw}")))?;
            let port = match rest.strip_prefix(':') {
                Some(port) => Some(port),
                None if rest.is_empty() => None,
                None => {
                    return Err(ProviderError::Connection(format!("invalid endpoint: {raw}")));
                }
            };
            (host, port)
        } else if raw.matches(':').count() == 1 {
            let (host, port) = raw.split_once(':').unwrap_or((raw, ""));
            (host, Some(port))
        } else {
            // Bare IPv6 literals carry several colons and no port
            (raw, None)
        };

        let port = match port {
            Some(port) => port
                .parse()
                .map_err(|_| ProviderError::Connection(format!("invalid port: {port}")))?,
            None => DEFAULT_PORT,
        };

        let host = if host.is_empty() { DEFAULT_HOST } else { host };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
