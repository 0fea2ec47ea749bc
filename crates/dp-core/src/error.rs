use derive_more::From;
use orion_error::{ErrorCode, StructError, UvsReason};

/// Reasons a filter cannot be built. Per-event failures never surface here;
/// they are reported as [`Fault`](crate::fault::Fault)s and error tags.
///
/// Settings other than the field list are rejected as `Uvs` configuration
/// errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error, From)]
pub enum CoreReason {
    #[error("malformed field list")]
    FieldList,
    #[error("unknown component accessor")]
    ComponentAccessor,
    #[error("{0}")]
    Uvs(UvsReason),
}

impl ErrorCode for CoreReason {
    fn error_code(&self) -> i32 {
        match self {
            Self::FieldList => 1101,
            Self::ComponentAccessor => 1102,
            Self::Uvs(u) => u.error_code(),
        }
    }
}

pub type CoreError = StructError<CoreReason>;
pub type CoreResult<T> = Result<T, CoreError>;
