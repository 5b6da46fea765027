// # Provider Implementations
//
// Providers that live in the core crate. Network-backed providers have
// their own crates.

pub mod memory;

pub use memory::{CallCounts, MemoryDnsApi};
