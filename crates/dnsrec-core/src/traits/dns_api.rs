// # DNS API Trait
//
// The narrow provider interface the reconciler is written against. It covers
// exactly what reconciling one "A" record needs: resolving a zone by name,
// listing records, creating a record, and updating one in place.
//
// ## Implementations
//
// - Cloudflare: `dnsrec-provider-cloudflare` crate
// - In-memory: `dnsrec_core::MemoryDnsApi`
//
// ## Usage
//
// ```rust,ignore
// use dnsrec_core::{DnsApi, RecordParams, RecordType};
//
// let zone_id = api.resolve_zone_id("example.com").await?;
// let records = api.list_records(&zone_id, RecordType::A, "www.example.com").await?;
// if records.is_empty() {
//     api.create_record(&zone_id, &RecordParams::a("www.example.com", "1.2.3.4", 300)).await?;
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type
///
/// Only "A" records are managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone resolved at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    /// Provider-assigned opaque ID
    pub id: String,
    /// Domain suffix, e.g. "example.com"
    pub name: String,
}

/// A DNS record as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record ID
    pub id: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Fully-qualified record name
    pub name: String,
    /// Record content (an IPv4 address for "A")
    pub content: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

/// Payload for creating or updating a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordParams {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

impl RecordParams {
    /// Build an "A" record payload
    pub fn a(name: impl Into<String>, content: impl Into<String>, ttl: u32) -> Self {
        Self {
            record_type: RecordType::A,
            name: name.into(),
            content: content.into(),
            ttl,
        }
    }

    /// The record the provider would hold after writing this payload under `id`
    pub fn into_record(self, id: impl Into<String>) -> DnsRecord {
        DnsRecord {
            id: id.into(),
            record_type: self.record_type,
            name: self.name,
            content: self.content,
            ttl: self.ttl,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Implementations perform one provider round-trip per call and return any
/// failure as an error. They do not retry, back off, or cache; that policy
/// belongs to whoever drives the reconciler.
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Resolve a zone's opaque ID from its domain name
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The zone ID
    /// - `Err(Error::NotFound)`: No zone with that name is visible to the credential
    /// - `Err(Error)`: Any other provider failure
    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String, crate::Error>;

    /// List records of `record_type` whose name is exactly `name`
    ///
    /// The provider's ordering is preserved. An empty list is not an error.
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name: &str,
    ) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a new record in the zone
    async fn create_record(
        &self,
        zone_id: &str,
        params: &RecordParams,
    ) -> Result<DnsRecord, crate::Error>;

    /// Replace the type, name, content and TTL of an existing record
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        params: &RecordParams,
    ) -> Result<DnsRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
