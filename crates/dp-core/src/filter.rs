use std::fmt;
use std::sync::Arc;

use orion_error::prelude::*;
use orion_error::{ErrorOwe, ErrorOweBase};

use dp_config::{DatePartsConfig, UnknownFieldPolicy};

use crate::component::Component;
use crate::duration::DurationSpec;
use crate::error::{CoreReason, CoreResult};
use crate::event::{EventAccess, Value};
use crate::fault::{Fault, TimeRole};
use crate::project::{FieldSpec, project};
use crate::report::{Diagnostics, LogDiagnostics, report};
use crate::resolve::resolve;

/// Name this stage is registered under in a pipeline.
pub const CONFIG_NAME: &str = "dateparts";

// ---------------------------------------------------------------------------
// FilterOutcome
// ---------------------------------------------------------------------------

/// Result of filtering one event. The event itself carries the error tags;
/// this tells the host how to route it.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Matched,
    Failed(Vec<Fault>),
}

impl FilterOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, FilterOutcome::Matched)
    }

    pub fn faults(&self) -> &[Fault] {
        match self {
            FilterOutcome::Matched => &[],
            FilterOutcome::Failed(faults) => faults,
        }
    }
}

// ---------------------------------------------------------------------------
// DateParts
// ---------------------------------------------------------------------------

/// Date-parts enrichment stage.
///
/// Built once from a [`DatePartsConfig`] and immutable afterwards, so one
/// instance can serve concurrent callers without locking.
///
/// Per event: resolve the primary time field (failure stops here), write
/// every configured component, then compute the optional duration. Faults
/// from the last two steps are collected and reported together with a
/// single tag append; fields that were written stay on the event.
pub struct DateParts {
    id: String,
    time_field: String,
    fields: Vec<FieldSpec>,
    error_tags: Vec<String>,
    duration: Option<DurationSpec>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl DateParts {
    /// Build with diagnostics going to the `log` facade.
    pub fn new(config: &DatePartsConfig) -> CoreResult<Self> {
        Self::with_diagnostics(config, Arc::new(LogDiagnostics))
    }

    pub fn with_diagnostics(
        config: &DatePartsConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> CoreResult<Self> {
        dp_config::validate_fields(&config.fields).owe(CoreReason::FieldList)?;
        dp_config::validate_filter(config).owe_conf()?;

        let fields = resolve_fields(&config.fields, config.unknown_fields)?;
        for spec in &fields {
            if let FieldSpec::Unknown(name) = spec {
                diagnostics.debug(
                    &config.id,
                    &format!("{name:?} is not a time component; events will be tagged"),
                );
            }
        }

        let duration = config
            .duration
            .as_ref()
            .map(|d| DurationSpec::resolve(d, &config.time_field));

        diagnostics.debug(&config.id, "DateParts filter registered");

        Ok(Self {
            id: config.id.clone(),
            time_field: config.time_field.clone(),
            fields,
            error_tags: config.error_tags.clone(),
            duration,
            diagnostics,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time_field(&self) -> &str {
        &self.time_field
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn error_tags(&self) -> &[String] {
        &self.error_tags
    }

    pub fn duration(&self) -> Option<&DurationSpec> {
        self.duration.as_ref()
    }

    /// Enrich one event in place. Never panics on event content; every
    /// failure is reported through the error tags and diagnostics.
    pub fn filter<E>(&self, event: &mut E) -> FilterOutcome
    where
        E: EventAccess + ?Sized,
    {
        let Some(t) = resolve(event.get(&self.time_field)) else {
            let fault = Fault::unresolvable(TimeRole::Primary, self.time_field.as_str());
            return self.fail(vec![fault], event);
        };

        if self.diagnostics.debug_enabled() {
            let names: Vec<&str> = self.fields.iter().map(FieldSpec::name).collect();
            self.diagnostics.debug(
                &self.id,
                &format!(
                    "filtering {} time_field and adding fields: {}",
                    self.time_field,
                    names.join(", ")
                ),
            );
        }

        let mut faults = project(&t, &self.fields, event);

        if let Some(duration) = &self.duration {
            match duration.compute(&*event) {
                Ok(secs) => event.set(&duration.result_field, Value::Float(secs)),
                Err(endpoint_faults) => faults.extend(endpoint_faults),
            }
        }

        if faults.is_empty() {
            FilterOutcome::Matched
        } else {
            self.fail(faults, event)
        }
    }

    fn fail<E>(&self, faults: Vec<Fault>, event: &mut E) -> FilterOutcome
    where
        E: EventAccess + ?Sized,
    {
        report(
            &faults,
            event,
            &self.error_tags,
            self.diagnostics.as_ref(),
            &self.id,
        );
        FilterOutcome::Failed(faults)
    }
}

impl fmt::Debug for DateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateParts")
            .field("id", &self.id)
            .field("time_field", &self.time_field)
            .field("fields", &self.fields)
            .field("error_tags", &self.error_tags)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

fn resolve_fields(names: &[String], policy: UnknownFieldPolicy) -> CoreResult<Vec<FieldSpec>> {
    names
        .iter()
        .map(|name| match policy {
            UnknownFieldPolicy::Reject => {
                name.parse::<Component>().map(FieldSpec::Known).map_err(|e| {
                    StructError::from(CoreReason::ComponentAccessor).with_detail(e.to_string())
                })
            }
            UnknownFieldPolicy::Tag => Ok(FieldSpec::lenient(name)),
        })
        .collect()
}

#[cfg(test)]
mod tests;
