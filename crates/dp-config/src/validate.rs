use std::collections::HashSet;

use crate::filter::DatePartsConfig;
use crate::pipeline::PipelineConfig;

/// Internal validation, called automatically during `PipelineConfig::from_str` / `load`.
pub(crate) fn validate(config: &PipelineConfig) -> anyhow::Result<()> {
    validate_filter(&config.filter)?;

    if config.runtime.workers == 0 {
        anyhow::bail!("runtime.workers must be > 0");
    }
    if config.runtime.batch_size == 0 {
        anyhow::bail!("runtime.batch_size must be > 0");
    }
    for (i, field) in config.runtime.time_fields.iter().enumerate() {
        if field.is_empty() {
            anyhow::bail!("runtime.time_fields[{i}] must not be empty");
        }
    }

    Ok(())
}

/// Structural checks on a filter config. Component names are not checked
/// here; the filter resolves them when it is built.
pub fn validate_filter(config: &DatePartsConfig) -> anyhow::Result<()> {
    if config.id.is_empty() {
        anyhow::bail!("filter.id must not be empty");
    }

    validate_fields(&config.fields)?;

    if config.time_field.is_empty() {
        anyhow::bail!("filter.time_field must not be empty");
    }

    if config.error_tags.is_empty() {
        anyhow::bail!("filter.error_tags must contain at least one tag");
    }
    if let Some(i) = config.error_tags.iter().position(|t| t.is_empty()) {
        anyhow::bail!("filter.error_tags[{i}] must not be empty");
    }

    if let Some(duration) = &config.duration {
        let keys = [
            ("start_field", &duration.start_field),
            ("end_field", &duration.end_field),
            ("result_field", &duration.result_field),
        ];
        for (key, value) in keys {
            if value.as_deref() == Some("") {
                anyhow::bail!("filter.duration.{key} must not be empty");
            }
        }
    }

    Ok(())
}

/// The field list must be non-empty, without blank or repeated names.
pub fn validate_fields(fields: &[String]) -> anyhow::Result<()> {
    if fields.is_empty() {
        anyhow::bail!("filter.fields must name at least one time component");
    }
    let mut seen = HashSet::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        if field.is_empty() {
            anyhow::bail!("filter.fields[{i}] must not be empty");
        }
        if !seen.insert(field.as_str()) {
            anyhow::bail!("filter.fields: duplicate field {field:?}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
