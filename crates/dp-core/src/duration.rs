use dp_config::DurationConfig;

use crate::event::{EventAccess, Instant};
use crate::fault::{Fault, TimeRole};
use crate::resolve::resolve;

/// Elapsed-time settings with every default already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationSpec {
    pub start_field: String,
    pub end_field: String,
    pub result_field: String,
}

impl DurationSpec {
    /// Missing endpoints fall back to `time_field`; a missing result field
    /// falls back to `duration_result`.
    pub fn resolve(config: &DurationConfig, time_field: &str) -> Self {
        Self {
            start_field: config.start_field_or(time_field).to_string(),
            end_field: config.end_field_or(time_field).to_string(),
            result_field: config.result_field().to_string(),
        }
    }

    /// Seconds from the start endpoint to the end endpoint. Nothing is
    /// written to the event; each endpoint that does not resolve adds a fault.
    pub fn compute<E>(&self, event: &E) -> Result<f64, Vec<Fault>>
    where
        E: EventAccess + ?Sized,
    {
        let start = resolve(event.get(&self.start_field));
        let end = resolve(event.get(&self.end_field));
        match (start, end) {
            (Some(start), Some(end)) => Ok(elapsed_seconds(&start, &end)),
            (start, end) => {
                let mut faults = Vec::with_capacity(2);
                if start.is_none() {
                    faults.push(Fault::unresolvable(
                        TimeRole::DurationStart,
                        self.start_field.as_str(),
                    ));
                }
                if end.is_none() {
                    faults.push(Fault::unresolvable(
                        TimeRole::DurationEnd,
                        self.end_field.as_str(),
                    ));
                }
                Err(faults)
            }
        }
    }
}

/// `end - start` in seconds. Negative when `end` precedes `start`.
pub fn elapsed_seconds(start: &Instant, end: &Instant) -> f64 {
    let delta = end.signed_duration_since(*start);
    if let Some(nanos) = delta.num_nanoseconds() {
        return nanos as f64 / 1_000_000_000.0;
    }
    if let Some(micros) = delta.num_microseconds() {
        return micros as f64 / 1_000_000.0;
    }
    delta.num_milliseconds() as f64 / 1_000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
