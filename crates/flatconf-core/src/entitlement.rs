//! Entitlement check performed once before any document processing.

use async_trait::async_trait;

/// Outcome of an entitlement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlement {
    /// The caller may run the tool.
    Granted,
    /// The service explicitly refused. Fatal.
    Denied(String),
    /// The service could not be asked (timeout, network failure, unexpected status).
    Unavailable(String),
}

/// Trait for entitlement backends.
#[async_trait]
pub trait EntitlementCheck: Send + Sync {
    /// Ask whether the calling environment may run the tool. Never fails; errors
    /// are reported as `Entitlement::Unavailable`.
    async fn check(&self) -> Entitlement;
}
