use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UnknownFieldPolicy
// ---------------------------------------------------------------------------

/// What the filter does with a configured field name that is not a known
/// time component.
///
/// `Reject` refuses to build the filter. `Tag` keeps the name and reports it
/// on every event as a field-level fault, leaving the other fields intact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    #[default]
    Reject,
    Tag,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_default_is_reject() {
        assert_eq!(UnknownFieldPolicy::default(), UnknownFieldPolicy::Reject);
    }

    #[test]
    fn policy_snake_case() {
        let p: UnknownFieldPolicy = serde_json::from_str("\"tag\"").unwrap();
        assert_eq!(p, UnknownFieldPolicy::Tag);
        assert!(serde_json::from_str::<UnknownFieldPolicy>("\"ignore\"").is_err());
    }
}
