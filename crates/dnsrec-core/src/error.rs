//! Error types for the reconciler
//!
//! Two kinds of failure reach callers: configuration errors, raised while
//! building a [`Reconciler`](crate::Reconciler), and provider errors, raised
//! by the DNS provider during lookup, create, or update. Provider errors that
//! come out of `update_a_record` are wrapped in [`Error::Operation`] so the
//! caller can see which step failed and for which record.

use std::fmt;
use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Provider round-trip that an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Resolving the zone ID by name
    ResolveZone,
    /// Listing existing records
    Fetch,
    /// Creating a record
    Create,
    /// Updating a record in place
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::ResolveZone => "resolve zone ID",
            Operation::Fetch => "fetch DNS records",
            Operation::Create => "create DNS record",
            Operation::Update => "update DNS record",
        };
        f.write_str(s)
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing credential, bad or unknown zone)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Zone or record does not exist at the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Provider failure with the operation and record it happened on
    #[error("failed to {operation} for {record_name}: {source}")]
    Operation {
        operation: Operation,
        record_name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Attach operation and record context to a provider error
    pub fn during(self, operation: Operation, record_name: impl Into<String>) -> Self {
        Self::Operation {
            operation,
            record_name: record_name.into(),
            source: Box::new(self),
        }
    }

    /// True for errors raised while configuring a reconciler
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// True for errors reported by, or on the way to, the DNS provider
    pub fn is_provider(&self) -> bool {
        !self.is_configuration()
    }

    /// The operation this error was raised during, if it carries that context
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Operation { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_context_in_message() {
        let err = Error::provider("cloudflare", "boom").during(Operation::Update, "a.example.com");
        assert_eq!(
            err.to_string(),
            "failed to update DNS record for a.example.com: Provider error (cloudflare): boom"
        );
        assert_eq!(err.operation(), Some(Operation::Update));
        assert!(err.is_provider());
    }

    #[test]
    fn classification() {
        assert!(Error::config("no token").is_configuration());
        assert!(!Error::config("no token").is_provider());
        assert!(Error::rate_limited("slow down").is_provider());
        assert!(Error::not_found("zone").is_provider());
        assert_eq!(Error::http("reset").operation(), None);
    }

    #[test]
    fn wrapped_error_exposes_source() {
        use std::error::Error as _;

        let err = Error::auth("bad token").during(Operation::Fetch, "x.example.com");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Authentication failed: bad token"));
    }
}
