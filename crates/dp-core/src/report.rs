use crate::event::EventAccess;
use crate::fault::Fault;

/// Where the filter sends its observations. Passed in at construction so
/// the core never reaches for process-wide logging state on its own.
pub trait Diagnostics: Send + Sync {
    /// Lets callers skip building debug messages nobody will see.
    fn debug_enabled(&self) -> bool {
        true
    }

    fn debug(&self, filter: &str, message: &str);

    fn error(&self, filter: &str, fault: &Fault);
}

/// Default sink: the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn debug_enabled(&self) -> bool {
        log::log_enabled!(log::Level::Debug)
    }

    fn debug(&self, filter: &str, message: &str) {
        log::debug!("{filter}: {message}");
    }

    fn error(&self, filter: &str, fault: &Fault) {
        log::error!("{filter} filter error: {fault}");
    }
}

/// Silent sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn debug_enabled(&self) -> bool {
        false
    }

    fn debug(&self, _filter: &str, _message: &str) {}

    fn error(&self, _filter: &str, _fault: &Fault) {}
}

/// Log every fault, then tag the event once. No-op when `faults` is empty.
pub fn report<E>(
    faults: &[Fault],
    event: &mut E,
    error_tags: &[String],
    diagnostics: &dyn Diagnostics,
    filter: &str,
) where
    E: EventAccess + ?Sized,
{
    if faults.is_empty() {
        return;
    }
    for fault in faults {
        diagnostics.error(filter, fault);
    }
    event.add_tags(error_tags);
}
