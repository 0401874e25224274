//! Baseline severity ladder wiring.

use std::fmt;

use logtree_sink::{CaptureSink, ConsoleMethod, ConsoleSink, SharedSink, shared};

use super::{DEFAULT_LEVEL, NONE_LEVEL, Relation, SeverityRegistry};
use crate::error::LoggingError;

/// Sinks consumed once by [`SeverityRegistry::bootstrap`], one per baseline level.
#[derive(Clone)]
pub struct BaselineSinks {
    /// Sink of the synthetic `NONE` anchor.
    pub none: SharedSink,
    /// `TRACE` sink.
    pub trace: SharedSink,
    /// `DEBUG` sink.
    pub debug: SharedSink,
    /// `LOG` sink, also the default level.
    pub log: SharedSink,
    /// `INFO` sink.
    pub info: SharedSink,
    /// `WARN` sink.
    pub warn: SharedSink,
    /// `ERROR` sink.
    pub error: SharedSink,
    /// `FATAL` sink.
    pub fatal: SharedSink,
}

impl BaselineSinks {
    /// Wires every level to the console method of the same name; `NONE` uses
    /// `log` and `FATAL` uses `error`.
    #[must_use]
    pub fn console() -> Self {
        let console = |method| shared(ConsoleSink::new(method));
        Self {
            none: console(ConsoleMethod::Log),
            trace: console(ConsoleMethod::Trace),
            debug: console(ConsoleMethod::Debug),
            log: console(ConsoleMethod::Log),
            info: console(ConsoleMethod::Info),
            warn: console(ConsoleMethod::Warn),
            error: console(ConsoleMethod::Error),
            fatal: console(ConsoleMethod::Error),
        }
    }

    /// Routes every level into the same sink.
    #[must_use]
    pub fn uniform(sink: SharedSink) -> Self {
        Self {
            none: sink.clone(),
            trace: sink.clone(),
            debug: sink.clone(),
            log: sink.clone(),
            info: sink.clone(),
            warn: sink.clone(),
            error: sink.clone(),
            fatal: sink,
        }
    }

    /// Routes every level into a clone of `capture`.
    #[must_use]
    pub fn capture(capture: &CaptureSink) -> Self {
        Self::uniform(shared(capture.clone()))
    }
}

impl Default for BaselineSinks {
    fn default() -> Self {
        Self::console()
    }
}

impl fmt::Debug for BaselineSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaselineSinks").finish_non_exhaustive()
    }
}

impl SeverityRegistry {
    /// Builds the baseline ladder
    /// `NONE < TRACE < DEBUG < LOG < INFO < WARN < ERROR < FATAL`.
    ///
    /// `NONE` is defined at rank 0 and every other level is inserted above its
    /// predecessor. Fails with [`LoggingError::MissingDefaultLevel`] when the
    /// default level did not come out of the insertions.
    pub fn bootstrap(sinks: BaselineSinks) -> Result<Self, LoggingError> {
        let registry = Self::new();
        registry.define_at(NONE_LEVEL, 0, sinks.none);

        let ladder = [
            ("TRACE", NONE_LEVEL, sinks.trace),
            ("DEBUG", "TRACE", sinks.debug),
            (DEFAULT_LEVEL, "DEBUG", sinks.log),
            ("INFO", DEFAULT_LEVEL, sinks.info),
            ("WARN", "INFO", sinks.warn),
            ("ERROR", "WARN", sinks.error),
            ("FATAL", "ERROR", sinks.fatal),
        ];
        for (name, sibling, sink) in ladder {
            registry.define_relative(name, sibling, Relation::Above, sink, false);
        }

        if !registry.contains(DEFAULT_LEVEL) {
            return Err(LoggingError::MissingDefaultLevel);
        }
        Ok(registry)
    }
}
