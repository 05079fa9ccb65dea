//! Error reporting sink for unexpected handler failures.

use serde_json::Value;
use tracing::{error, info};

/// Receives errors that should reach an error-tracking service.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &(dyn std::error::Error + 'static));

    /// Diagnostic data attached to a failed handler, with the payload that
    /// triggered it. Logged as its own line by default.
    fn report_data(&self, data: &Value, payload: &Value) {
        info!(error = %data, %payload, "Handler error data");
    }
}

/// Default reporter: forwards to `tracing` under the `telemetry` target so a
/// subscriber layer can ship the record to an external tracker.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, err: &(dyn std::error::Error + 'static)) {
        error!(target: "telemetry", error = %err, "reported error");
    }
}
