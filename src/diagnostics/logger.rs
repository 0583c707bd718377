//! Per-connection diagnostic logger.
//!
//! # State
//! Two independent switches: `enabled` and sink-present. Both may be flipped
//! from any thread while the connection is sending or receiving.
//!
//! # Concurrency
//! The sink slot is an `ArcSwapOption`. `log_into_stream` is the only writer
//! of the slot; `log` takes one snapshot of it and works on that snapshot, so
//! every entry lands in exactly one sink version.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;

use crate::diagnostics::entry::{LogEntry, LogFormat};
use crate::diagnostics::severity::Severity;
use crate::diagnostics::sink::{LogSink, SharedSink};
use crate::net::connection::ConnectionId;
use crate::observability::metrics;

/// Identity stamped on every entry. Plain data, not a handle to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOwner {
    pub connection: ConnectionId,
    pub transport: &'static str,
}

/// Construction-time settings for a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerOptions {
    /// Initial value of the enabled switch.
    pub enabled: bool,
    pub format: LogFormat,
    /// Surface sink write failures as `tracing` warnings.
    pub report_sink_failures: bool,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            format: LogFormat::Text,
            report_sink_failures: true,
        }
    }
}

/// Currently attached sink plus the swap generation it was attached in.
struct AttachedSink {
    sink: Weak<dyn LogSink>,
    generation: u64,
}

/// Diagnostic logger owned by exactly one connection.
pub struct ConnectionLogger {
    owner: LogOwner,
    enabled: AtomicBool,
    format: AtomicU8,
    report_sink_failures: bool,
    sink: ArcSwapOption<AttachedSink>,
    generation: AtomicU64,
    /// Last sink generation a failure warning was emitted for; 0 is none.
    warned_generation: AtomicU64,
    released: AtomicBool,
}

impl ConnectionLogger {
    pub fn new(owner: LogOwner, options: LoggerOptions) -> Self {
        Self {
            owner,
            enabled: AtomicBool::new(options.enabled),
            format: AtomicU8::new(options.format.to_u8()),
            report_sink_failures: options.report_sink_failures,
            sink: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
            warned_generation: AtomicU64::new(0),
            released: AtomicBool::new(false),
        }
    }

    pub fn owner(&self) -> LogOwner {
        self.owner
    }

    pub fn enable_logging(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enable_logging(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn format(&self) -> LogFormat {
        LogFormat::from_u8(self.format.load(Ordering::Relaxed))
    }

    /// Change the line format; applies from the next entry.
    pub fn set_format(&self, format: LogFormat) {
        self.format.store(format.to_u8(), Ordering::Relaxed);
    }

    /// Replace the sink. `None` detaches; the previous sink is never written
    /// to again by entries that start after this call returns.
    ///
    /// Ignored once the logger has been released.
    pub fn log_into_stream(&self, sink: Option<&SharedSink>) {
        if self.released.load(Ordering::Acquire) {
            tracing::debug!(connection_id = %self.owner.connection, "Sink swap ignored, logger released");
            return;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let next = sink.map(|s| {
            Arc::new(AttachedSink {
                sink: Arc::downgrade(s),
                generation,
            })
        });
        let attached = next.is_some();
        self.sink.store(next);

        // A release racing with this swap must still win.
        if self.released.load(Ordering::Acquire) {
            self.sink.store(None);
            return;
        }

        metrics::record_sink_swap(attached);
        tracing::debug!(
            connection_id = %self.owner.connection,
            generation,
            attached,
            "Log sink swapped"
        );
    }

    pub fn attach_sink(&self, sink: &SharedSink) {
        self.log_into_stream(Some(sink));
    }

    pub fn detach_sink(&self) {
        self.log_into_stream(None);
    }

    /// True if a sink is attached and still alive.
    pub fn has_sink(&self) -> bool {
        self.sink
            .load()
            .as_ref()
            .map(|attached| attached.sink.strong_count() > 0)
            .unwrap_or(false)
    }

    /// Generation of the attached sink, `None` when detached.
    pub fn sink_generation(&self) -> Option<u64> {
        self.sink.load().as_ref().map(|attached| attached.generation)
    }

    /// Write one entry if logging is enabled and a sink is attached.
    ///
    /// Never fails and never panics on behalf of the sink.
    pub fn log(
        &self,
        message: &str,
        error: Option<&(dyn std::error::Error + 'static)>,
        severity: Severity,
    ) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }

        let Some(attached) = self.sink.load_full() else {
            return;
        };
        let Some(sink) = attached.sink.upgrade() else {
            return;
        };

        let entry = LogEntry::new(
            self.owner.connection,
            self.owner.transport,
            severity,
            message,
            error,
        );

        let written = panic::catch_unwind(AssertUnwindSafe(|| -> std::io::Result<()> {
            let bytes = entry.render(self.format())?;
            sink.write_entry(&bytes)
        }));

        match written {
            Ok(Ok(())) => metrics::record_log_entry(severity),
            Ok(Err(e)) => self.sink_failed(attached.generation, &e.to_string()),
            Err(_) => self.sink_failed(attached.generation, "sink panicked"),
        }
    }

    /// Clear the sink and stop accepting swaps. Called on connection teardown.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.sink.store(None);
        tracing::trace!(connection_id = %self.owner.connection, "Connection logger released");
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Every failure is counted; only the first per attached sink is warned
    /// about, so a dead sink cannot flood the tracing output.
    fn sink_failed(&self, generation: u64, reason: &str) {
        metrics::record_sink_failure();
        if self.report_sink_failures && self.first_failure_in(generation) {
            tracing::warn!(
                connection_id = %self.owner.connection,
                generation,
                reason,
                "Diagnostic sink write failed, dropping entries until the sink is swapped"
            );
        }
    }

    fn first_failure_in(&self, generation: u64) -> bool {
        self.warned_generation.swap(generation, Ordering::AcqRel) != generation
    }
}

impl std::fmt::Debug for ConnectionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionLogger")
            .field("owner", &self.owner)
            .field("enabled", &self.enable_logging())
            .field("format", &self.format())
            .field("sink_generation", &self.sink_generation())
            .field("released", &self.is_released())
            .finish()
    }
}
