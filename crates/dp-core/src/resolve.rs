use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::event::{Instant, Timestamp, Value};

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A value that wraps an instant and hands it out on request.
pub trait TimeWrapper {
    fn time(&self) -> Instant;
}

/// A value that can convert itself into an instant.
pub trait ToInstant {
    fn to_instant(&self) -> Instant;
}

impl TimeWrapper for Timestamp {
    fn time(&self) -> Instant {
        DateTime::from_timestamp_nanos(self.nanos())
    }
}

/// Midnight at the start of the date, UTC.
impl ToInstant for NaiveDate {
    fn to_instant(&self) -> Instant {
        self.and_time(NaiveTime::MIN).and_utc()
    }
}

/// Wall-clock reading taken as UTC; no zone conversion happens.
impl ToInstant for NaiveDateTime {
    fn to_instant(&self) -> Instant {
        self.and_utc()
    }
}

// ---------------------------------------------------------------------------
// TimeSource — classification of a field value
// ---------------------------------------------------------------------------

/// How (and whether) a field value yields an instant.
///
/// Classification is ordered: a native instant wins over a wrapper, which
/// wins over a convertible value. Everything else is [`TimeSource::NotATime`].
pub enum TimeSource<'a> {
    Native(Instant),
    Wrapper(&'a dyn TimeWrapper),
    Convertible(&'a dyn ToInstant),
    NotATime,
}

impl<'a> TimeSource<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Time(t)) => TimeSource::Native(*t),
            Some(Value::Timestamp(ts)) => TimeSource::Wrapper(ts),
            Some(Value::Date(d)) => TimeSource::Convertible(d),
            Some(Value::Naive(dt)) => TimeSource::Convertible(dt),
            _ => TimeSource::NotATime,
        }
    }

    pub fn instant(&self) -> Option<Instant> {
        match self {
            TimeSource::Native(t) => Some(*t),
            TimeSource::Wrapper(w) => Some(w.time()),
            TimeSource::Convertible(c) => Some(c.to_instant()),
            TimeSource::NotATime => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TimeSource::Native(_) => "native",
            TimeSource::Wrapper(_) => "wrapper",
            TimeSource::Convertible(_) => "convertible",
            TimeSource::NotATime => "not-a-time",
        }
    }
}

/// Resolve a field value to an instant. `None` for absent fields and for
/// values with no time meaning.
pub fn resolve(value: Option<&Value>) -> Option<Instant> {
    TimeSource::classify(value).instant()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
