// # dnsrec - one-shot A-record reconciler
//
// Thin integration layer: reads configuration from environment variables,
// initializes logging, builds a Cloudflare-backed reconciler and applies a
// single record. All DNS logic lives in dnsrec-core.
//
// ## Configuration
//
// - `DNSREC_API_TOKEN`: Cloudflare API token (required)
// - `DNSREC_ZONE`: Zone name, e.g. example.com (required)
// - `DNSREC_RECORD`: Record name, e.g. www.example.com (required)
// - `DNSREC_IP`: IPv4 address for the record (required)
// - `DNSREC_TTL`: TTL in seconds; values below 1 mean 60 (optional)
// - `DNSREC_MODE`: `live` (default) or `dry-run` to skip writes (optional)
// - `DNSREC_API_BASE`: Override the Cloudflare API base URL (optional)
// - `DNSREC_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DNSREC_API_TOKEN=your_token
// export DNSREC_ZONE=example.com
// export DNSREC_RECORD=home.example.com
// export DNSREC_IP=203.0.113.7
//
// dnsrec
// ```

use anyhow::{Context, Result};
use dnsrec_core::{ReconcilerConfig, UpdateOutcome};
use dnsrec_provider_cloudflare::connect_with_config;
use std::env;
use std::net::Ipv4Addr;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Record reconciled (created, updated, unchanged, or outside the zone)
/// - 1: Configuration or startup error
/// - 2: Provider or runtime error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DnsrecExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DnsrecExitCode> for ExitCode {
    fn from(code: DnsrecExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    reconciler: ReconcilerConfig,
    record: String,
    ip: Ipv4Addr,
    ttl: i32,
    log_level: Level,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .with_context(|| format!("{} is required", key))
        };

        let ip = required("DNSREC_IP")?;
        let ip: Ipv4Addr = ip
            .parse()
            .with_context(|| format!("DNSREC_IP must be an IPv4 address. Got: {}", ip))?;

        let ttl = match lookup("DNSREC_TTL") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DNSREC_TTL must be an integer. Got: {}", raw))?,
            None => 0,
        };

        let dry_run = parse_dry_run(&lookup("DNSREC_MODE").unwrap_or_default())?;

        let log_level =
            parse_level(&lookup("DNSREC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()))?;

        let mut reconciler =
            ReconcilerConfig::new(required("DNSREC_API_TOKEN")?, required("DNSREC_ZONE")?)
                .with_dry_run(dry_run);
        if let Some(base) = lookup("DNSREC_API_BASE").filter(|v| !v.trim().is_empty()) {
            reconciler = reconciler.with_api_base(base.trim());
        }
        reconciler.validate()?;

        Ok(Self {
            reconciler,
            record: required("DNSREC_RECORD")?,
            ip,
            ttl,
            log_level,
        })
    }
}

fn parse_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNSREC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

fn parse_dry_run(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" | "live" => Ok(false),
        "dry-run" => Ok(true),
        _ => anyhow::bail!(
            "DNSREC_MODE '{}' is not valid. \
            Valid modes: live, dry-run",
            raw
        ),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DnsrecExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DnsrecExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DnsrecExitCode::RuntimeError.into();
        }
    };

    rt.block_on(run(config)).into()
}

async fn run(config: Config) -> DnsrecExitCode {
    let reconciler = match connect_with_config(&config.reconciler).await {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to initialize reconciler: {}", e);
            return exit_code_for(&e);
        }
    };

    match reconciler
        .update_a_record(&config.record, config.ip, config.ttl)
        .await
    {
        Ok(outcome) => {
            info!("{}", describe(&outcome));
            DnsrecExitCode::Success
        }
        Err(e) => {
            error!("{}", e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(err: &dnsrec_core::Error) -> DnsrecExitCode {
    if err.is_configuration() {
        DnsrecExitCode::ConfigError
    } else {
        DnsrecExitCode::RuntimeError
    }
}

fn describe(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::OutsideZone { record_name } => {
            format!("{}: skipped (outside zone)", record_name)
        }
        UpdateOutcome::Unchanged { record_name, ip } => {
            format!("{}: unchanged ({})", record_name, ip)
        }
        UpdateOutcome::Updated {
            record_name,
            previous_content,
            ip,
            ttl,
            ..
        } => format!("{}: updated {} -> {} (ttl {})", record_name, previous_content, ip, ttl),
        UpdateOutcome::Created {
            record_name,
            ip,
            ttl,
            ..
        } => format!("{}: created {} (ttl {})", record_name, ip, ttl),
    }
}
