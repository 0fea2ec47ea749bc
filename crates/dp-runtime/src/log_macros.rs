/// Domain-aware logging macros.
///
/// Each macro injects a `domain` field so log consumers can filter by area:
/// `sys` (startup and shutdown), `conf` (configuration), `pipe` (event
/// processing).
///
/// ```ignore
/// use crate::log_macros::*;
///
/// dp_info!(sys, workers = 4, "pipeline ready");
/// dp_warn!(pipe, line = 12, error = %e, "skipping undecodable line");
/// ```
///
/// The domain is a bare identifier, not a string.

/// Internal helper.  Do not call directly; use `dp_error!` … `dp_trace!`.
#[doc(hidden)]
macro_rules! dp_log {
    ($level:ident, $domain:ident, $($field:tt)*) => {
        tracing::$level!(domain = stringify!($domain), $($field)*)
    };
}

macro_rules! dp_error {
    ($domain:ident, $($rest:tt)*) => {
        dp_log!(error, $domain, $($rest)*)
    };
}

macro_rules! dp_warn {
    ($domain:ident, $($rest:tt)*) => {
        dp_log!(warn, $domain, $($rest)*)
    };
}

macro_rules! dp_info {
    ($domain:ident, $($rest:tt)*) => {
        dp_log!(info, $domain, $($rest)*)
    };
}

macro_rules! dp_debug {
    ($domain:ident, $($rest:tt)*) => {
        dp_log!(debug, $domain, $($rest)*)
    };
}

macro_rules! dp_trace {
    ($domain:ident, $($rest:tt)*) => {
        dp_log!(trace, $domain, $($rest)*)
    };
}
