use serde::{Deserialize, Serialize};

use crate::filter::DEFAULT_TIME_FIELD;

/// Host-side processing settings. The entire `[runtime]` section may be
/// omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// JSON fields whose RFC 3339 strings are decoded into timestamps before
    /// the event reaches the filter.
    pub time_fields: Vec<String>,
    /// Upper bound on blocking tasks filtering one batch.
    pub workers: usize,
    /// Number of input lines read before a batch is dispatched.
    pub batch_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            time_fields: vec![DEFAULT_TIME_FIELD.to_string()],
            workers: 4,
            batch_size: 256,
        }
    }
}
