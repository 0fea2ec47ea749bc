use std::fmt;

/// Which timestamp a failed resolution was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRole {
    Primary,
    DurationStart,
    DurationEnd,
}

impl TimeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRole::Primary => "time",
            TimeRole::DurationStart => "duration start",
            TimeRole::DurationEnd => "duration end",
        }
    }
}

impl fmt::Display for TimeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failure while enriching one event. Faults never leave the filter as
/// errors; they end up as error tags and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error(
        "invalid {role} field {field:?}; it must hold an instant or a value that yields one"
    )]
    UnresolvableTimeField { role: TimeRole, field: String },
    #[error("no such time component: {name:?}")]
    UnknownComponentAccessor { name: String },
}

impl Fault {
    pub fn unresolvable(role: TimeRole, field: impl Into<String>) -> Self {
        Fault::UnresolvableTimeField {
            role,
            field: field.into(),
        }
    }

    pub fn unknown_component(name: impl Into<String>) -> Self {
        Fault::UnknownComponentAccessor { name: name.into() }
    }

    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Fault::UnresolvableTimeField { .. } => "unresolvable_time_field",
            Fault::UnknownComponentAccessor { .. } => "unknown_component_accessor",
        }
    }
}
