use dp_core::{Diagnostics, Fault};

/// Routes filter diagnostics into `tracing` under the `pipe` domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn debug_enabled(&self) -> bool {
        tracing::enabled!(tracing::Level::DEBUG)
    }

    fn debug(&self, filter: &str, message: &str) {
        dp_debug!(pipe, filter, "{message}");
    }

    fn error(&self, filter: &str, fault: &Fault) {
        dp_error!(pipe, filter, kind = fault.kind(), "DateParts filter error: {fault}");
    }
}
