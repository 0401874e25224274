#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logtree/src/lib.rs
//!
//! # Overview
//!
//! `logtree` organises loggers in a tree of colon-separated namespaces rooted
//! at `*`. Each logger carries a default level, a threshold level and an
//! enabled flag; a logging call is forwarded to the sink of its level only
//! when the logger is enabled and the level ranks at or above the threshold.
//!
//! # Design
//!
//! - [`SeverityRegistry`] maps level names to sinks and relative ranks. New
//!   levels are inserted above, below or beside an existing one and the
//!   ladder is renumbered so ranks stay strictly ordered.
//! - [`Logger`] nodes are memoized per namespace: one namespace, one
//!   instance. [`Logger::get_logger`] accepts absolute (`*:a:b`), relative
//!   (`a:b`) and single-segment paths.
//! - [`NamespaceConfig`] holds persisted per-namespace overrides, loaded once
//!   from a [`ConfigStore`]. A namespace forced off stays off.
//! - [`Logger::call`], [`Logger::as_level`] and [`Logger::log`] resolve a
//!   call into a [`BoundCall`]: the level's sink bound to the prefix
//!   `[LEVEL][namespace]`, or a no-op.
//! - [`Context`] owns one registry and one tree; [`global()`] exposes a lazily
//!   built process-wide context.
//!
//! Library diagnostics (unknown anchors, ignored configuration) go through
//! `tracing` under the `logtree::*` targets, never through the tree itself.
//!
//! # Examples
//!
//! ```
//! use logtree::{BaselineSinks, Context, LoggerConfig, info_log};
//! use logtree_sink::CaptureSink;
//!
//! let capture = CaptureSink::new();
//! let ctx = Context::builder()
//!     .sinks(BaselineSinks::capture(&capture))
//!     .plain()
//!     .build()?;
//!
//! let db = ctx.get_logger_with("app:db", &LoggerConfig::new().min_level("warn"));
//! info_log!(db, "pool size {}", 8);
//! db.warn()?.emit("pool exhausted");
//!
//! let lines = capture.drain();
//! assert_eq!(lines.len(), 1);
//! assert_eq!(lines[0].rendered(), "[WARN][*:app:db] pool exhausted");
//! # Ok::<(), logtree::LoggingError>(())
//! ```

mod config;
mod context;
mod dispatch;
mod error;
mod global;
mod macros;
mod severity;
#[cfg(feature = "tracing-bridge")]
mod tracing_bridge;
mod tree;

pub use config::{
    ConfigStore, EnvStore, FileStore, MemoryStore, NAMESPACE_CONFIG_KEY, NamespaceConfig,
    NamespaceOverride, NoStore,
};
pub use context::{Context, ContextBuilder, NO_COLOR_ENV};
pub use dispatch::{BoundCall, ERROR_LEVEL, INVALID_LEVEL_MARKER, invoke, render_prefix};
pub use error::{ConfigError, LoggingError};
pub use global::{get_logger, get_logger_with, global, install, reset_global};
pub use severity::{
    BaselineSinks, DEFAULT_LEVEL, DEFAULT_MIN_LEVEL, HandlerSnapshot, NONE_LEVEL, Relation,
    SeverityLevel, SeverityRegistry,
};
#[cfg(feature = "tracing-bridge")]
pub use tracing_bridge::{TRACING_TARGET, TracingInitError, TracingSink, init_tracing};
pub use tree::{Logger, LoggerConfig, ROOT_NAMESPACE, SEPARATOR};

pub use logtree_sink as sink;
