//! crates/logtree/src/tracing_bridge.rs
//! Bridge from logtree sinks into the `tracing` ecosystem.
//!
//! [`TracingSink`] re-emits logtree calls as `tracing` events under the
//! `logtree` target, carrying the rendered prefix as a field. Combined with
//! [`BaselineSinks::tracing`] a whole context can be routed through whatever
//! subscriber the application installed.
//!
//! ```rust,ignore
//! use logtree::{BaselineSinks, Context, init_tracing};
//!
//! init_tracing(Some("logtree=debug"))?;
//! let ctx = Context::builder().sinks(BaselineSinks::tracing()).plain().build()?;
//! ctx.get_logger("net").info()?.emit("connected");
//! ```

use std::fmt;

use logtree_sink::{Sink, shared};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::severity::BaselineSinks;

/// Target of events emitted by [`TracingSink`].
pub const TRACING_TARGET: &str = "logtree";

/// Sink that forwards every line as a `tracing` event at a fixed level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    /// Creates a sink emitting at `level`.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Level events are emitted at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Sink for TracingSink {
    fn emit(&self, prefix: &str, args: fmt::Arguments<'_>) {
        match self.level {
            Level::TRACE => tracing::trace!(target: TRACING_TARGET, prefix, "{args}"),
            Level::DEBUG => tracing::debug!(target: TRACING_TARGET, prefix, "{args}"),
            Level::INFO => tracing::info!(target: TRACING_TARGET, prefix, "{args}"),
            Level::WARN => tracing::warn!(target: TRACING_TARGET, prefix, "{args}"),
            Level::ERROR => tracing::error!(target: TRACING_TARGET, prefix, "{args}"),
        }
    }
}

impl BaselineSinks {
    /// Routes every baseline level to the closest `tracing` level. `NONE`
    /// and `LOG` map to `INFO`; `FATAL` maps to `ERROR`.
    #[must_use]
    pub fn tracing() -> Self {
        let at = |level| shared(TracingSink::new(level));
        Self {
            none: at(Level::INFO),
            trace: at(Level::TRACE),
            debug: at(Level::DEBUG),
            log: at(Level::INFO),
            info: at(Level::INFO),
            warn: at(Level::WARN),
            error: at(Level::ERROR),
            fatal: at(Level::ERROR),
        }
    }
}

/// Failure to install the global `tracing` subscriber.
#[derive(Debug, Error)]
pub enum TracingInitError {
    /// The filter directives did not parse.
    #[error("invalid tracing filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    #[error(transparent)]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Installs a formatting subscriber as the global default.
///
/// `directives` uses the `EnvFilter` syntax; `None` reads `RUST_LOG` and
/// falls back to `info`.
pub fn init_tracing(directives: Option<&str>) -> Result<(), TracingInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}
