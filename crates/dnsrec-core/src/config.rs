//! Configuration types for the reconciler
//!
//! This module defines the settings needed to bind a reconciler to a zone.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings for building a reconciler
#[derive(Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Provider API token
    pub api_token: String,

    /// Zone domain name, e.g. "example.com"
    pub zone_name: String,

    /// Perform reads but skip writes at the provider
    #[serde(default)]
    pub dry_run: bool,

    /// Provider API base URL; `None` means the provider's public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

// Keep the token out of logs and panic messages
impl fmt::Debug for ReconcilerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcilerConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_name", &self.zone_name)
            .field("dry_run", &self.dry_run)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ReconcilerConfig {
    /// Create a new configuration in live mode
    pub fn new(api_token: impl Into<String>, zone_name: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            zone_name: zone_name.into(),
            dry_run: false,
            api_base: None,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Send requests to a different API base URL (proxies, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.trim().is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }

        let bad_base = self
            .api_base
            .as_deref()
            .filter(|base| !(base.starts_with("http://") || base.starts_with("https://")));
        if let Some(base) = bad_base {
            return Err(crate::Error::config(format!(
                "API base URL must start with http:// or https://. Got: {}",
                base
            )));
        }

        validate_domain_name(&self.zone_name)
    }
}

/// Check that `domain` is a syntactically valid DNS name
///
/// Basic RFC 1035 rules: total length at most 253, labels non-empty, at most
/// 63 characters, alphanumeric or hyphen, not starting or ending with a hyphen.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    if domain.is_empty() {
        return Err(crate::Error::config("Zone name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}
