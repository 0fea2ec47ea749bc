use crate::component::Component;
use crate::event::{EventAccess, Instant, Value};
use crate::fault::Fault;

/// One configured output field, resolved when the filter is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    Known(Component),
    /// Kept only under the `tag` policy; fails on every event.
    Unknown(String),
}

impl FieldSpec {
    /// Parse a configured name. Unknown names are kept, not rejected.
    pub fn lenient(name: &str) -> Self {
        match name.parse() {
            Ok(c) => FieldSpec::Known(c),
            Err(_) => FieldSpec::Unknown(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldSpec::Known(c) => c.name(),
            FieldSpec::Unknown(name) => name,
        }
    }

    /// Output name and value for this field at `t`.
    pub fn project(&self, t: &Instant) -> Result<(&str, Value), Fault> {
        match self {
            FieldSpec::Known(c) => Ok((c.name(), Value::Int(c.extract(t)))),
            FieldSpec::Unknown(name) => Err(Fault::unknown_component(name.as_str())),
        }
    }
}

/// Write every field in order. A failing field does not stop the others;
/// its fault is returned instead.
pub fn project<E>(t: &Instant, fields: &[FieldSpec], event: &mut E) -> Vec<Fault>
where
    E: EventAccess + ?Sized,
{
    let mut faults = Vec::new();
    for spec in fields {
        match spec.project(t) {
            Ok((name, value)) => event.set(name, value),
            Err(fault) => faults.push(fault),
        }
    }
    faults
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
