//! Test doubles and common utilities for reconciler contract tests

#![allow(dead_code)]

use dnsrec_core::{DnsRecord, LogSink, MemoryDnsApi, Reconciler, RecordType};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

pub const ZONE: &str = "example.com";
pub const ZONE_ID: &str = "zone-123";

/// Log level as seen by the recording sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
}

/// A LogSink that keeps every message it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    entries: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Messages logged at `level`
    pub fn at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, args: fmt::Arguments<'_>) {
        self.entries.lock().unwrap().push((level, args.to_string()));
    }
}

impl LogSink for RecordingSink {
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Debug, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Info, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Warn, args);
    }
}

/// Memory provider with the test zone registered
pub fn test_api() -> MemoryDnsApi {
    MemoryDnsApi::new().with_zone(ZONE, ZONE_ID)
}

/// Reconciler bound to the test zone, plus the sink it logs to
pub async fn reconciler(api: &MemoryDnsApi) -> (Reconciler, RecordingSink) {
    let sink = RecordingSink::new();
    let reconciler = Reconciler::new(Arc::new(api.clone()), ZONE, Arc::new(sink.clone()))
        .await
        .expect("reconciler construction succeeds");
    (reconciler, sink)
}

/// Existing "A" record fixture
pub fn a_record(id: &str, name: &str, content: &str, ttl: u32) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type: RecordType::A,
        name: name.to_string(),
        content: content.to_string(),
        ttl,
    }
}

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().expect("valid IPv4 literal")
}
