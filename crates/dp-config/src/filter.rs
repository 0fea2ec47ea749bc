use serde::{Deserialize, Serialize};

use crate::types::UnknownFieldPolicy;

/// Components written when `fields` is omitted, in output order.
pub const DEFAULT_FIELDS: [&str; 9] = [
    "day", "wday", "yday", "mday", "month", "year", "hour", "min", "sec",
];

pub const DEFAULT_TIME_FIELD: &str = "@timestamp";
pub const DEFAULT_ERROR_TAG: &str = "_dateparts_error";
pub const DEFAULT_RESULT_FIELD: &str = "duration_result";
pub const DEFAULT_FILTER_ID: &str = "dateparts";

// ---------------------------------------------------------------------------
// DatePartsConfig — deserialized from [filter]
// ---------------------------------------------------------------------------

/// Settings for one date-parts filter instance. Every key has a default, so
/// an empty `[filter]` table is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatePartsConfig {
    /// Name used to identify this filter in diagnostics.
    pub id: String,
    /// Time components to write, each under its own name.
    pub fields: Vec<String>,
    /// Event field holding the reference timestamp.
    pub time_field: String,
    /// Tags appended to an event when any step fails.
    pub error_tags: Vec<String>,
    /// Handling of names in `fields` that are not time components.
    pub unknown_fields: UnknownFieldPolicy,
    /// Optional elapsed-time computation. Absent means no duration is written.
    pub duration: Option<DurationConfig>,
}

impl Default for DatePartsConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_FILTER_ID.to_string(),
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            time_field: DEFAULT_TIME_FIELD.to_string(),
            error_tags: vec![DEFAULT_ERROR_TAG.to_string()],
            unknown_fields: UnknownFieldPolicy::default(),
            duration: None,
        }
    }
}

impl DatePartsConfig {
    /// Shorthand for a default config writing only `fields`.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// DurationConfig — deserialized from [filter.duration]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DurationConfig {
    pub start_field: Option<String>,
    pub end_field: Option<String>,
    pub result_field: Option<String>,
}

impl DurationConfig {
    /// Start endpoint, falling back to the filter's primary time field.
    pub fn start_field_or<'a>(&'a self, time_field: &'a str) -> &'a str {
        self.start_field.as_deref().unwrap_or(time_field)
    }

    /// End endpoint, falling back to the filter's primary time field.
    pub fn end_field_or<'a>(&'a self, time_field: &'a str) -> &'a str {
        self.end_field.as_deref().unwrap_or(time_field)
    }

    pub fn result_field(&self) -> &str {
        self.result_field.as_deref().unwrap_or(DEFAULT_RESULT_FIELD)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
