//! A-record reconciler
//!
//! The [`Reconciler`] is bound to one zone. Each call to
//! [`Reconciler::update_a_record`] runs one linear decision procedure:
//!
//! ```text
//! normalize name ─▶ zone guard ─▶ default TTL ─▶ list "A" records
//!                      │                              │
//!                      ▼                    ┌─────────┼──────────┐
//!                 OutsideZone               ▼         ▼          ▼
//!                                       Unchanged  Updated    Created
//! ```
//!
//! Calls are independent and converge: repeating a call with the same
//! arguments leaves the record as it is. Concurrent calls for the same name
//! race at the provider (last writer wins); callers that need stronger
//! guarantees serialize per name themselves.

use crate::error::{Error, Operation, Result};
use crate::traits::{DnsApi, LogSink, RecordParams, RecordType, Zone};
use std::borrow::Cow;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// TTL written when the caller asks for less than one second
pub const DEFAULT_TTL: u32 = 60;

/// Names ending in this token get [`SPECIAL_TLD`] appended
const SPECIAL_SUFFIX: &str = "ls90";
const SPECIAL_TLD: &str = ".co";

/// What a successful reconciliation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The name does not belong to the managed zone; nothing was sent
    OutsideZone { record_name: String },

    /// The first matching record already pointed at the address
    Unchanged { record_name: String, ip: Ipv4Addr },

    /// An existing record was rewritten in place
    Updated {
        record_name: String,
        record_id: String,
        previous_content: String,
        ip: Ipv4Addr,
        ttl: u32,
    },

    /// No record existed, so one was created
    Created {
        record_name: String,
        record_id: String,
        ip: Ipv4Addr,
        ttl: u32,
    },
}

impl UpdateOutcome {
    /// Record name after normalization
    pub fn record_name(&self) -> &str {
        match self {
            UpdateOutcome::OutsideZone { record_name }
            | UpdateOutcome::Unchanged { record_name, .. }
            | UpdateOutcome::Updated { record_name, .. }
            | UpdateOutcome::Created { record_name, .. } => record_name,
        }
    }

    /// True if a write was sent to the provider
    pub fn changed(&self) -> bool {
        matches!(
            self,
            UpdateOutcome::Updated { .. } | UpdateOutcome::Created { .. }
        )
    }
}

/// Reconciles "A" records inside a single zone
///
/// Created once with [`Reconciler::new`], which resolves the zone ID. The
/// zone binding never changes afterwards, so a reconciler can be shared
/// (e.g. behind an `Arc`) and called concurrently for different names.
pub struct Reconciler {
    api: Arc<dyn DnsApi>,
    zone: Zone,
    log: Arc<dyn LogSink>,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("provider", &self.api.provider_name())
            .field("zone", &self.zone)
            .finish()
    }
}

impl Reconciler {
    /// Bind a reconciler to `zone_name`, resolving its ID at the provider
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the zone name is invalid, the provider has no such
    ///   zone, or the provider rejects the credential
    /// - `Error::Operation` wrapping any other provider failure (transport, 5xx, rate limit)
    pub async fn new(
        api: Arc<dyn DnsApi>,
        zone_name: impl Into<String>,
        log: Arc<dyn LogSink>,
    ) -> Result<Self> {
        let zone_name = zone_name.into();
        crate::config::validate_domain_name(&zone_name)?;

        let id = match api.resolve_zone_id(&zone_name).await {
            Ok(id) => id,
            Err(Error::NotFound(_)) => {
                return Err(Error::config(format!(
                    "failed to get zone ID for {}: zone not found",
                    zone_name
                )));
            }
            Err(Error::Authentication(msg)) => {
                return Err(Error::config(format!(
                    "failed to get zone ID for {}: credential rejected: {}",
                    zone_name, msg
                )));
            }
            Err(e) => return Err(e.during(Operation::ResolveZone, zone_name)),
        };

        log.debug(format_args!(
            "Resolved zone {} to ID {} via {}",
            zone_name,
            id,
            api.provider_name()
        ));

        Ok(Self {
            api,
            zone: Zone {
                id,
                name: zone_name,
            },
            log,
        })
    }

    /// The zone this reconciler is bound to
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Ensure `record_name` has an "A" record pointing at `ip`
    ///
    /// A `ttl` below 1 is replaced by [`DEFAULT_TTL`]. Names outside the zone
    /// are skipped with a warning and are not an error.
    ///
    /// # Errors
    ///
    /// Any provider failure during lookup, create, or update, wrapped as
    /// `Error::Operation`. A failed lookup never proceeds to a write.
    pub async fn update_a_record(
        &self,
        record_name: &str,
        ip: Ipv4Addr,
        ttl: i32,
    ) -> Result<UpdateOutcome> {
        let record_name = normalize_record_name(record_name).into_owned();

        if !self.in_zone(&record_name) {
            self.log.warn(format_args!(
                "Ignoring record {}: does not belong to zone {}",
                record_name, self.zone.name
            ));
            return Ok(UpdateOutcome::OutsideZone { record_name });
        }

        let ttl = effective_ttl(ttl);
        let content = ip.to_string();

        let records = self
            .api
            .list_records(&self.zone.id, RecordType::A, &record_name)
            .await
            .map_err(|e| e.during(Operation::Fetch, record_name.as_str()))?;

        let params = RecordParams::a(record_name.as_str(), content.as_str(), ttl);

        match records.into_iter().next() {
            Some(existing) if existing.content == content => {
                self.log
                    .debug(format_args!("A record {} already up-to-date", record_name));
                Ok(UpdateOutcome::Unchanged { record_name, ip })
            }
            Some(existing) => {
                self.api
                    .update_record(&self.zone.id, &existing.id, &params)
                    .await
                    .map_err(|e| e.during(Operation::Update, record_name.as_str()))?;

                self.log.info(format_args!(
                    "Updated A record: {} -> {} (was: {})",
                    record_name, ip, existing.content
                ));
                Ok(UpdateOutcome::Updated {
                    record_name,
                    record_id: existing.id,
                    previous_content: existing.content,
                    ip,
                    ttl,
                })
            }
            None => {
                let created = self
                    .api
                    .create_record(&self.zone.id, &params)
                    .await
                    .map_err(|e| e.during(Operation::Create, record_name.as_str()))?;

                self.log
                    .info(format_args!("Created new A record: {} -> {}", record_name, ip));
                Ok(UpdateOutcome::Created {
                    record_name,
                    record_id: created.id,
                    ip,
                    ttl,
                })
            }
        }
    }

    fn in_zone(&self, record_name: &str) -> bool {
        record_name.ends_with(self.zone.name.as_str())
    }
}

/// Apply the fixed name rewrite: a trailing `ls90` gets `.co` appended
///
/// This is a literal rule for one subdomain suffix and is not generalized.
pub fn normalize_record_name(record_name: &str) -> Cow<'_, str> {
    if record_name.ends_with(SPECIAL_SUFFIX) {
        Cow::Owned(format!("{}{}", record_name, SPECIAL_TLD))
    } else {
        Cow::Borrowed(record_name)
    }
}

/// TTL to write for a requested value
pub fn effective_ttl(ttl: i32) -> u32 {
    if ttl < 1 {
        return DEFAULT_TTL;
    }
    u32::try_from(ttl).unwrap_or(DEFAULT_TTL)
}
