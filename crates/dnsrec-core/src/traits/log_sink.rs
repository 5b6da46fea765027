//! Logging capability
//!
//! The reconciler never logs through global state directly. It is handed a
//! [`LogSink`] at construction; in a normal process that is [`TracingSink`],
//! and tests substitute a sink that records what was logged.

use std::fmt;

/// Leveled, best-effort log output
pub trait LogSink: Send + Sync {
    /// Debug-level message
    fn debug(&self, args: fmt::Arguments<'_>);

    /// Info-level message
    fn info(&self, args: fmt::Arguments<'_>);

    /// Warning-level message
    fn warn(&self, args: fmt::Arguments<'_>);
}

/// Sink that forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!("{}", args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!("{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!("{}", args);
    }
}
