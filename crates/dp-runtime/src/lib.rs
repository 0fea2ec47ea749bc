#[macro_use]
mod log_macros;

pub mod diagnostics;
pub mod error;
pub mod event_bridge;
pub mod metrics;
pub mod pipeline;
pub mod tracing_init;

pub use diagnostics::TracingDiagnostics;
pub use error::{RuntimeError, RuntimeReason, RuntimeResult};
pub use event_bridge::{decode_event, encode_event};
pub use metrics::{PipelineMetrics, RunReport};
pub use pipeline::Pipeline;
pub use tracing_init::init_tracing;
