// # dnsrec-core
//
// Core library for keeping DNS "A" records of one provider zone in line with
// the addresses a caller wants them to have.
//
// ## Architecture Overview
//
// - **DnsApi**: Trait for the four provider operations (resolve zone, list, create, update)
// - **LogSink**: Injected logging capability, `TracingSink` by default
// - **Reconciler**: Bound to one zone; drives a single record toward its desired address
// - **MemoryDnsApi**: In-memory provider for tests and local embedding
//
// ## Flow
//
// 1. Normalize the record name and check it belongs to the zone
// 2. Look up existing "A" records with that exact name
// 3. Create, update, or leave the record alone
// 4. Log the outcome through the sink
//
// Every call is independent. Retries, backoff and per-name serialization are
// left to the caller.

pub mod config;
pub mod error;
pub mod provider;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use config::ReconcilerConfig;
pub use error::{Error, Operation, Result};
pub use provider::MemoryDnsApi;
pub use reconciler::{DEFAULT_TTL, Reconciler, UpdateOutcome};
pub use traits::{DnsApi, DnsRecord, LogSink, RecordParams, RecordType, TracingSink, Zone};
