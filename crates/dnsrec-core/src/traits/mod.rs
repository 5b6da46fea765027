//! Core traits for the reconciler
//!
//! - [`DnsApi`]: The provider operations the reconciler consumes
//! - [`LogSink`]: The logging capability injected into the reconciler

pub mod dns_api;
pub mod log_sink;

pub use dns_api::{DnsApi, DnsRecord, RecordParams, RecordType, Zone};
pub use log_sink::{LogSink, TracingSink};
