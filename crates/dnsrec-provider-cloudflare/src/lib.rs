// # Cloudflare DNS Provider
//
// `DnsApi` implementation backed by the Cloudflare API v4, and the
// `connect` helpers that turn a token and a zone name into a ready
// `Reconciler`.
//
// ## Behavior
//
// - One HTTP request per trait call; errors go straight back to the caller
// - No retry, backoff, rate limiting, or caching
// - 30 second HTTP timeout per request
// - Status codes mapped to specific errors (401/403, 404, 429, 5xx)
// - Dry-run mode: reads are performed, writes are logged and skipped
//
// ## Security
//
// - The API token never appears in logs, errors, or `Debug` output
// - An empty token is rejected at construction
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dnsrec_core::traits::{DnsApi, DnsRecord, RecordParams, RecordType, TracingSink};
use dnsrec_core::{Error, Reconciler, ReconcilerConfig, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER: &str = "cloudflare";

/// Standard Cloudflare response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct CfZone {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CfRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    content: String,
    ttl: u32,
}

impl TryFrom<CfRecord> for DnsRecord {
    type Error = Error;

    fn try_from(record: CfRecord) -> Result<Self> {
        let record_type = match record.record_type.as_str() {
            "A" => RecordType::A,
            other => {
                return Err(Error::provider(
                    PROVIDER,
                    format!("Unexpected record type {} for {}", other, record.name),
                ));
            }
        };

        Ok(DnsRecord {
            id: record.id,
            record_type,
            name: record.name,
            content: record.content,
            ttl: record.ttl,
        })
    }
}

/// Cloudflare DNS API client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the client will:
/// - Perform all GET requests (zone lookup, record lookup)
/// - Log the intended POST/PATCH payload
/// - **NOT** send the write, returning the record as it would have been written
pub struct CloudflareApi {
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    client: reqwest::Client,

    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareApi")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareApi {
    /// Create a client for the public Cloudflare API
    ///
    /// # Errors
    ///
    /// `Error::Config` if the token is empty or the HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE, dry_run)
    }

    /// Create a client against a different base URL (proxies, tests)
    pub fn with_base_url(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a client from validated configuration
    pub fn from_config(config: &ReconcilerConfig) -> Result<Self> {
        config.validate()?;
        Self::with_base_url(
            config.api_token.clone(),
            config.api_base.as_deref().unwrap_or(CLOUDFLARE_API_BASE),
            config.dry_run,
        )
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send an authenticated request and unwrap the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<T> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(status_error(status, context, &error_text));
        }

        let parsed: ApiResponse<T> = response.json().await.map_err(|e| {
            Error::provider(PROVIDER, format!("{}: Failed to parse response: {}", context, e))
        })?;

        if !parsed.success {
            return Err(Error::provider(
                PROVIDER,
                format!("{}: {}", context, describe_errors(&parsed.errors)),
            ));
        }

        parsed.result.ok_or_else(|| {
            Error::provider(PROVIDER, format!("{}: Response has no result", context))
        })
    }
}

/// Map a non-success HTTP status to an error
fn status_error(status: StatusCode, context: &str, error_text: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: Invalid API token or insufficient permissions. Status: {}",
            context, status
        )),
        404 => Error::not_found(format!("{}: {}", context, status)),
        429 => Error::rate_limited(format!(
            "{}: Rate limit exceeded. Status: {}",
            context, status
        )),
        500..=599 => Error::provider(
            PROVIDER,
            format!(
                "{}: Cloudflare server error (transient): {} - {}",
                context, status, error_text
            ),
        ),
        _ => Error::provider(
            PROVIDER,
            format!("{}: {} - {}", context, status, error_text),
        ),
    }
}

fn describe_errors(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "API reported failure without details".to_string();
    }
    errors
        .iter()
        .map(|e| format!("[{}] {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl DnsApi for CloudflareApi {
    async fn resolve_zone_id(&self, zone_name: &str) -> Result<String> {
        tracing::debug!("Looking up zone ID for domain: {}", zone_name);

        let request = self
            .client
            .get(self.url("/zones"))
            .query(&[("name", zone_name)]);
        let zones: Vec<CfZone> = self.send(request, "Zone lookup").await?;

        let zone = zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", zone_name)))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(zone.id)
    }

    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name: &str,
    ) -> Result<Vec<DnsRecord>> {
        tracing::debug!("Looking up records: {} (type: {})", name, record_type);

        let request = self
            .client
            .get(self.url(&format!("/zones/{}/dns_records", zone_id)))
            .query(&[("type", record_type.as_str()), ("name", name)]);
        let records: Vec<CfRecord> = self.send(request, "Record lookup").await?;

        records.into_iter().map(DnsRecord::try_from).collect()
    }

    async fn create_record(&self, zone_id: &str, params: &RecordParams) -> Result<DnsRecord> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST to zone {} with payload: {}",
                zone_id,
                serde_json::to_string(params)?
            );
            return Ok(params.clone().into_record("dry-run"));
        }

        let request = self
            .client
            .post(self.url(&format!("/zones/{}/dns_records", zone_id)))
            .json(params);
        let record: CfRecord = self.send(request, "Record create").await?;

        DnsRecord::try_from(record)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        params: &RecordParams,
    ) -> Result<DnsRecord> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH for record {} with payload: {}",
                record_id,
                serde_json::to_string(params)?
            );
            return Ok(params.clone().into_record(record_id));
        }

        let request = self
            .client
            .patch(self.url(&format!("/zones/{}/dns_records/{}", zone_id, record_id)))
            .json(params);
        let record: CfRecord = self.send(request, "Record update").await?;

        DnsRecord::try_from(record)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Build a reconciler for `zone_name` using a Cloudflare API token
///
/// Makes one request to resolve the zone ID. Logs go to `tracing`.
pub async fn connect(
    api_token: impl Into<String>,
    zone_name: impl Into<String>,
) -> Result<Reconciler> {
    connect_with_config(&ReconcilerConfig::new(api_token, zone_name)).await
}

/// Build a reconciler from configuration, honoring dry-run
pub async fn connect_with_config(config: &ReconcilerConfig) -> Result<Reconciler> {
    let api = CloudflareApi::from_config(config)?;

    if api.is_dry_run() {
        tracing::warn!("Cloudflare provider running in DRY-RUN mode - no changes will be made");
    }

    Reconciler::new(Arc::new(api), config.zone_name.clone(), Arc::new(TracingSink)).await
}
