//! crates/logtree/src/macros.rs
//! Formatting macros over the dynamic call path.
//!
//! Each macro takes a logger (or anything that dereferences to one) followed
//! by `format!`-style arguments. They never fail: an unknown level passed to
//! [`log_at!`] is reported through the `ERROR` sink.

/// Logs at a level named at run time.
///
/// # Example
/// ```
/// let ctx = logtree::Context::builder().plain().build()?;
/// let logger = ctx.get_logger("db");
/// logtree::log_at!(logger, "warn", "slow query: {} ms", 250);
/// # Ok::<(), logtree::LoggingError>(())
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.invoke($level, ::std::format_args!($($arg)+))
    };
}

/// Logs at `TRACE`.
#[macro_export]
macro_rules! trace_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, "TRACE", $($arg)+)
    };
}

/// Logs at `DEBUG`.
#[macro_export]
macro_rules! debug_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, "DEBUG", $($arg)+)
    };
}

/// Logs at the logger's current default level.
#[macro_export]
macro_rules! default_log {
    ($logger:expr, $($arg:tt)+) => {
        $logger.log().call(::std::format_args!($($arg)+))
    };
}

/// Logs at `INFO`.
#[macro_export]
macro_rules! info_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, "INFO", $($arg)+)
    };
}

/// Logs at `WARN`.
#[macro_export]
macro_rules! warn_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, "WARN", $($arg)+)
    };
}

/// Logs at `ERROR`.
#[macro_export]
macro_rules! error_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, "ERROR", $($arg)+)
    };
}

/// Logs at `FATAL`.
#[macro_export]
macro_rules! fatal_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, "FATAL", $($arg)+)
    };
}
