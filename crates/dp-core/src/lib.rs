//! Date-parts enrichment for structured events.
//!
//! [`DateParts`] reads a timestamp from one event field, writes a configured
//! set of calendar and clock components back onto the event, and optionally
//! the signed number of seconds between two timestamp fields. Failures never
//! escape as errors: the event is tagged and the outcome says it failed.

pub mod component;
pub mod duration;
pub mod error;
pub mod event;
pub mod fault;
pub mod filter;
pub mod project;
pub mod report;
pub mod resolve;

pub use component::{Component, UnknownComponent};
pub use duration::{DurationSpec, elapsed_seconds};
pub use error::{CoreError, CoreReason, CoreResult};
pub use event::{Event, EventAccess, Instant, TAGS_FIELD, Timestamp, Value};
pub use fault::{Fault, TimeRole};
pub use filter::{CONFIG_NAME, DateParts, FilterOutcome};
pub use project::FieldSpec;
pub use report::{Diagnostics, LogDiagnostics, NoopDiagnostics};
pub use resolve::{TimeSource, TimeWrapper, ToInstant, resolve};
