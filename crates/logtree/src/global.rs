//! crates/logtree/src/global.rs
//! Process-wide context built lazily from the environment.
//!
//! The first access bootstraps a [`Context`] with [`Context::from_env`].
//! Tests and embedders can replace it with [`install`]; loggers obtained
//! before the swap keep pointing at the previous tree.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::context::Context;
use crate::error::LoggingError;
use crate::tree::{Logger, LoggerConfig};

static GLOBAL: LazyLock<RwLock<Arc<Context>>> = LazyLock::new(|| {
    let context = match Context::from_env() {
        Ok(context) => context,
        Err(err) => panic!("cannot bootstrap the global logging context: {err}"),
    };
    RwLock::new(Arc::new(context))
});

/// Returns the process-wide context.
#[must_use]
pub fn global() -> Arc<Context> {
    Arc::clone(&GLOBAL.read().unwrap_or_else(PoisonError::into_inner))
}

/// Returns the logger for `path` from the process-wide tree.
pub fn get_logger(path: &str) -> Arc<Logger> {
    global().get_logger(path)
}

/// Returns the logger for `path` from the process-wide tree; `config`
/// applies to the nodes this call creates.
pub fn get_logger_with(path: &str, config: &LoggerConfig) -> Arc<Logger> {
    global().get_logger_with(path, config)
}

/// Replaces the process-wide context and returns the previous one.
pub fn install(context: Context) -> Arc<Context> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, Arc::new(context))
}

/// Rebuilds the process-wide context from the environment.
pub fn reset_global() -> Result<Arc<Context>, LoggingError> {
    Ok(install(Context::from_env()?))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use logtree_sink::CaptureSink;

    use super::*;
    use crate::severity::BaselineSinks;

    static SERIAL: Mutex<()> = Mutex::new(());

    #[test]
    fn global_lookups_are_memoized() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let a = get_logger("global:memo");
        let b = global().get_logger("*:global:memo");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn install_swaps_the_tree() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let capture = CaptureSink::new();
        let ctx = Context::builder()
            .sinks(BaselineSinks::capture(&capture))
            .plain()
            .build()
            .expect("context");
        let previous = install(ctx);
        let stale = previous.get_logger("swap");

        let fresh = get_logger("swap");
        assert!(!Arc::ptr_eq(&stale, &fresh));
        fresh.invoke("warn", format_args!("captured"));
        assert_eq!(capture.drain()[0].rendered(), "[WARN][*:swap] captured");

        reset_global().expect("rebuild from environment");
        assert!(capture.is_empty());
    }

    #[test]
    fn config_applies_on_first_global_lookup() {
        let _guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        let logger = get_logger_with("global:configured", &LoggerConfig::new().min_level("warn"));
        assert_eq!(logger.min_level(), "WARN");
    }
}
