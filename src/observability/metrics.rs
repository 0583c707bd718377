//! Metrics collection and exposition.
//!
//! # Metrics
//! - `conn_addons_log_entries_total` (counter): entries written, by severity
//! - `conn_addons_sink_failures_total` (counter): entries dropped by a failing sink
//! - `conn_addons_sink_swaps_total` (counter): sink swaps, by attach/detach
//! - `conn_addons_raw_data_sent_total` (counter): raw data packets handed to a transport
//! - `conn_addons_raw_data_rejected_total` (counter): raw data sends skipped for missing payload
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::diagnostics::Severity;

/// Install the Prometheus exporter on `addr`. Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_log_entry(severity: Severity) {
    counter!("conn_addons_log_entries_total", "severity" => severity.as_str()).increment(1);
}

pub fn record_sink_failure() {
    counter!("conn_addons_sink_failures_total").increment(1);
}

pub fn record_sink_swap(attached: bool) {
    let action = if attached { "attach" } else { "detach" };
    counter!("conn_addons_sink_swaps_total", "action" => action).increment(1);
}

pub fn record_raw_data_sent() {
    counter!("conn_addons_raw_data_sent_total").increment(1);
}

pub fn record_raw_data_rejected() {
    counter!("conn_addons_raw_data_rejected_total").increment(1);
}
