// # Memory DNS API
//
// In-memory implementation of DnsApi.
//
// ## Purpose
//
// Holds zones and records in a map so the reconciler can run without a
// network. Useful for tests and for embedders that want to exercise their
// wiring locally before pointing it at a real provider.
//
// ## Behavior
//
// - Zones are registered up front with `with_zone`
// - Record IDs are assigned sequentially ("rec-1", "rec-2", ...)
// - Every operation is counted, whether it succeeds or not
// - A single operation can be armed to fail with `fail_on`

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use async_trait::async_trait;

use crate::error::Operation;
use crate::traits::dns_api::{DnsApi, DnsRecord, RecordParams, RecordType};
use crate::Error;

/// Number of calls made to each operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub resolve_zone: usize,
    pub list: usize,
    pub create: usize,
    pub update: usize,
}

impl CallCounts {
    /// Create and update calls combined
    pub fn writes(&self) -> usize {
        self.create + self.update
    }
}

#[derive(Debug, Default)]
struct State {
    /// zone ID -> records in insertion order
    records: HashMap<String, Vec<DnsRecord>>,
    fail_on: Option<Operation>,
}

#[derive(Debug, Default)]
struct Counters {
    resolve_zone: AtomicUsize,
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    next_id: AtomicUsize,
}

/// In-memory DNS provider
///
/// Clones share the same state, so a test can keep one handle for
/// assertions and give another to the reconciler.
///
/// # Example
///
/// ```rust,no_run
/// use dnsrec_core::{DnsApi, MemoryDnsApi, RecordType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = MemoryDnsApi::new().with_zone("example.com", "zone-1");
///
///     let zone_id = api.resolve_zone_id("example.com").await?;
///     let records = api.list_records(&zone_id, RecordType::A, "www.example.com").await?;
///     assert!(records.is_empty());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDnsApi {
    /// zone name -> zone ID, fixed once the provider is handed out
    zones: Arc<HashMap<String, String>>,
    state: Arc<RwLock<State>>,
    counters: Arc<Counters>,
}

impl MemoryDnsApi {
    /// Create a provider with no zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone
    pub fn with_zone(mut self, zone_name: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.zones).insert(zone_name.into(), zone_id.into());
        self
    }

    /// Seed a record directly, bypassing counters
    pub async fn insert_record(&self, zone_id: &str, record: DnsRecord) {
        let mut state = self.state.write().await;
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(record);
    }

    /// Make every subsequent call of `operation` fail
    pub async fn fail_on(&self, operation: Operation) {
        self.state.write().await.fail_on = Some(operation);
    }

    /// Stop injecting failures
    pub async fn clear_failure(&self) {
        self.state.write().await.fail_on = None;
    }

    /// All records currently held for a zone
    pub async fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.state
            .read()
            .await
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot of the call counters
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            resolve_zone: self.counters.resolve_zone.load(Ordering::SeqCst),
            list: self.counters.list.load(Ordering::SeqCst),
            create: self.counters.create.load(Ordering::SeqCst),
            update: self.counters.update.load(Ordering::SeqCst),
        }
    }

    fn check_failure(state: &State, operation: Operation) -> Result<(), Error> {
        if state.fail_on == Some(operation) {
            return Err(Error::provider(
                "memory",
                format!("injected failure on {}", operation),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DnsApi for MemoryDnsApi {
    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String, Error> {
        self.counters.resolve_zone.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, Operation::ResolveZone)?;

        self.zones
            .get(zone_name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", zone_name)))
    }

    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name: &str,
    ) -> Result<Vec<DnsRecord>, Error> {
        self.counters.list.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        Self::check_failure(&state, Operation::Fetch)?;

        Ok(state
            .records
            .get(zone_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.record_type == record_type && r.name == name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_record(
        &self,
        zone_id: &str,
        params: &RecordParams,
    ) -> Result<DnsRecord, Error> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        Self::check_failure(&state, Operation::Create)?;

        let id = self.counters.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = params.clone().into_record(format!("rec-{}", id));
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        params: &RecordParams,
    ) -> Result<DnsRecord, Error> {
        self.counters.update.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        Self::check_failure(&state, Operation::Update)?;

        let record = state
            .records
            .get_mut(zone_id)
            .and_then(|records| records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", record_id)))?;

        *record = params.clone().into_record(record_id);
        Ok(record.clone())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
