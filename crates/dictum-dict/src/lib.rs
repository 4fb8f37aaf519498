//! DICT protocol (RFC 2229) session provider.

mod client;
mod provider;
mod reply;

pub use client::DictConnection;
pub use provider::DictProvider;
