pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod runtime;
pub mod types;
pub mod validate;

pub use filter::{
    DEFAULT_ERROR_TAG, DEFAULT_FIELDS, DEFAULT_FILTER_ID, DEFAULT_RESULT_FIELD,
    DEFAULT_TIME_FIELD, DatePartsConfig, DurationConfig,
};
pub use logging::{LogFormat, LoggingConfig};
pub use pipeline::PipelineConfig;
pub use runtime::RuntimeConfig;
pub use types::UnknownFieldPolicy;
pub use validate::{validate_fields, validate_filter};
