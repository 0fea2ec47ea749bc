use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Field holding an event's tag list.
pub const TAGS_FIELD: &str = "tags";

/// A point in time. All components are read in UTC.
pub type Instant = DateTime<Utc>;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// Field value carried inside an [`Event`].
///
/// Besides plain scalars and containers there are three time-bearing shapes:
/// a native instant (`Time`), a wrapper that hands out its instant
/// (`Timestamp`), and calendar values that convert themselves (`Date`,
/// `Naive`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Time(Instant),
    Timestamp(Timestamp),
    Date(NaiveDate),
    Naive(NaiveDateTime),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Instant> for Value {
    fn from(t: Instant) -> Self {
        Value::Time(t)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Pipeline timestamp: nanoseconds since the Unix epoch.
///
/// Covers 1677-09-21 through 2262-04-11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// `None` when `t` falls outside the representable range.
    pub fn from_instant(t: &Instant) -> Option<Self> {
        t.timestamp_nanos_opt().map(Self)
    }

    pub fn nanos(&self) -> i64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// EventAccess — what the filter needs from a host event
// ---------------------------------------------------------------------------

/// Field and tag access on a host-owned event.
pub trait EventAccess {
    fn get(&self, field: &str) -> Option<&Value>;

    fn set(&mut self, field: &str, value: Value);

    /// Append each tag not already present, preserving order.
    fn add_tags(&mut self, tags: &[String]);
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A structured record: named fields with heterogeneous values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub fields: HashMap<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Current tags, in insertion order. A scalar string `tags` field counts
    /// as a single tag.
    pub fn tags(&self) -> Vec<&str> {
        match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::Str(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }
}

impl FromIterator<(String, Value)> for Event {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl EventAccess for Event {
    fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    fn add_tags(&mut self, tags: &[String]) {
        let slot = self
            .fields
            .entry(TAGS_FIELD.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Str(s) = slot {
            let legacy = std::mem::take(s);
            *slot = Value::Array(vec![Value::Str(legacy)]);
        } else if !matches!(slot, Value::Array(_)) {
            *slot = Value::Array(Vec::new());
        }
        if let Value::Array(items) = slot {
            for tag in tags {
                if !items.iter().any(|v| v.as_str() == Some(tag.as_str())) {
                    items.push(Value::Str(tag.clone()));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
