//! crates/logtree/src/dispatch.rs
//! Call-site resolver: turns a logger plus a requested level into either a
//! sink bound with its prefix or a no-op.
//!
//! Three call shapes share one gate (enabled flag and threshold rank) but
//! differ in how the level is found:
//!
//! - [`Logger::as_level`] and the named accessors fail with
//!   [`LoggingError::UnknownLevel`] for an unknown name.
//! - [`Logger::call`] never fails. An unknown name is logged through the
//!   `ERROR` sink with an `[Invalid logging level]` marker.
//! - [`Logger::log`] uses the logger's current default level.
//!
//! The gate is read when the call is resolved, so a [`BoundCall`] reflects the
//! settings at that moment. Ranks are compared as they stand in the registry
//! at that point, so inserting a level never reorders a threshold.

use std::fmt;

use logtree_sink::{SharedSink, ThemeTable};

use crate::error::LoggingError;
use crate::severity::SeverityLevel;
use crate::tree::Logger;

/// Level used for calls made with an unknown level name.
pub const ERROR_LEVEL: &str = "ERROR";
/// Marker appended to the prefix of calls made with an unknown level name.
pub const INVALID_LEVEL_MARKER: &str = "[Invalid logging level]";

/// Renders `[LEVEL][namespace]`, decorating the level label when `themes`
/// has an entry for it.
#[must_use]
pub fn render_prefix(level: &str, namespace: &str, themes: &ThemeTable) -> String {
    let label = themes.apply(level, &format!("[{level}]"));
    format!("{label}[{namespace}]")
}

#[derive(Clone)]
struct Target {
    sink: SharedSink,
    prefix: String,
}

/// Resolved logging call: a sink with its rendered prefix, or a no-op.
///
/// ```
/// use logtree::{BaselineSinks, Context};
/// use logtree_sink::CaptureSink;
///
/// let capture = CaptureSink::new();
/// let ctx = Context::builder()
///     .sinks(BaselineSinks::capture(&capture))
///     .plain()
///     .build()?;
///
/// let logger = ctx.get_logger("http");
/// logger.info()?.call(format_args!("GET {} -> {}", "/", 200));
/// logger.debug()?.call(format_args!("suppressed below INFO"));
///
/// let lines = capture.drain();
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].prefix, "[INFO][*:http]");
/// assert_eq!(lines[0].message, "GET / -> 200");
/// # Ok::<(), logtree::LoggingError>(())
/// ```
#[derive(Clone)]
#[must_use = "a bound call does nothing until it is called"]
pub struct BoundCall {
    target: Option<Target>,
}

impl BoundCall {
    fn bound(sink: SharedSink, prefix: String) -> Self {
        Self {
            target: Some(Target { sink, prefix }),
        }
    }

    /// A call that swallows its arguments.
    pub const fn noop() -> Self {
        Self { target: None }
    }

    /// Reports whether calling this does nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.target.is_none()
    }

    /// Rendered prefix, or `None` for a no-op.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.target.as_ref().map(|target| target.prefix.as_str())
    }

    /// Forwards `args` to the sink.
    pub fn call(&self, args: fmt::Arguments<'_>) {
        if let Some(target) = &self.target {
            target.sink.emit(&target.prefix, args);
        }
    }

    /// Forwards positional arguments joined by single spaces.
    pub fn call_all(&self, args: &[&dyn fmt::Display]) {
        if self.target.is_some() {
            self.call(format_args!("{}", Joined(args)));
        }
    }

    /// Forwards a single displayable message.
    pub fn emit(&self, message: impl fmt::Display) {
        self.call(format_args!("{message}"));
    }
}

impl fmt::Debug for BoundCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix() {
            Some(prefix) => f.debug_tuple("BoundCall").field(&prefix).finish(),
            None => f.write_str("BoundCall(noop)"),
        }
    }
}

struct Joined<'a>(&'a [&'a dyn fmt::Display]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, arg) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

impl Logger {
    /// Resolves a dynamic level name. Never fails.
    ///
    /// Unknown names resolve to the `ERROR` sink with the prefix
    /// `[ERROR][namespace][Invalid logging level][NAME]`, gated at the rank
    /// of `ERROR`.
    pub fn call(&self, level: &str) -> BoundCall {
        let name = level.to_ascii_uppercase();
        if let Some(severity) = self.shared.severities.lookup(&name) {
            return self.bind(&severity, &name);
        }

        tracing::trace!(
            target: "logtree::dispatch",
            namespace = %self.namespace(),
            requested = %name,
            "unknown level in dynamic call"
        );
        let error = self.shared.severities.resolve(ERROR_LEVEL);
        if !self.admits(error.rank()) {
            return BoundCall::noop();
        }
        let prefix = format!(
            "{}{INVALID_LEVEL_MARKER}[{name}]",
            render_prefix(ERROR_LEVEL, self.namespace(), &self.shared.themes)
        );
        BoundCall::bound(error.handler().clone(), prefix)
    }

    /// Resolves an explicit level name, failing when it is unknown.
    pub fn as_level(&self, level: &str) -> Result<BoundCall, LoggingError> {
        let severity = self.shared.severities.require(level)?;
        let name = severity.name().to_owned();
        Ok(self.bind(&severity, &name))
    }

    /// Resolves the logger's current default level.
    pub fn log(&self) -> BoundCall {
        let (level, prefix) = {
            let state = self.state();
            (state.level.clone(), state.level_prefix.clone())
        };
        let severity = self.shared.severities.resolve_quiet(&level);
        if !self.admits(severity.rank()) {
            return BoundCall::noop();
        }
        BoundCall::bound(severity.handler().clone(), prefix)
    }

    /// Resolves `TRACE`.
    pub fn trace(&self) -> Result<BoundCall, LoggingError> {
        self.as_level("TRACE")
    }

    /// Resolves `DEBUG`.
    pub fn debug(&self) -> Result<BoundCall, LoggingError> {
        self.as_level("DEBUG")
    }

    /// Resolves `INFO`.
    pub fn info(&self) -> Result<BoundCall, LoggingError> {
        self.as_level("INFO")
    }

    /// Resolves `WARN`.
    pub fn warn(&self) -> Result<BoundCall, LoggingError> {
        self.as_level("WARN")
    }

    /// Resolves `ERROR`.
    pub fn error(&self) -> Result<BoundCall, LoggingError> {
        self.as_level(ERROR_LEVEL)
    }

    /// Resolves `FATAL`.
    pub fn fatal(&self) -> Result<BoundCall, LoggingError> {
        self.as_level("FATAL")
    }

    /// Logs `args` at `level` through the dynamic path. Never fails.
    pub fn invoke(&self, level: &str, args: fmt::Arguments<'_>) {
        self.call(level).call(args);
    }

    fn bind(&self, severity: &SeverityLevel, name: &str) -> BoundCall {
        if !self.admits(severity.rank()) {
            return BoundCall::noop();
        }
        let prefix = render_prefix(name, self.namespace(), &self.shared.themes);
        BoundCall::bound(severity.handler().clone(), prefix)
    }
}

/// Logs `args` at `level` on `logger` through the dynamic path.
pub fn invoke(logger: &Logger, level: &str, args: fmt::Arguments<'_>) {
    logger.invoke(level, args);
}

#[cfg(test)]
mod tests {
    use logtree_sink::{CaptureSink, Rgb, Theme, colorize, shared};

    use super::*;
    use crate::context::Context;
    use crate::severity::{BaselineSinks, Relation};

    fn capture_context() -> (Context, CaptureSink) {
        let capture = CaptureSink::new();
        let ctx = Context::builder()
            .sinks(BaselineSinks::capture(&capture))
            .plain()
            .build()
            .expect("context");
        (ctx, capture)
    }

    #[test]
    fn prefix_is_plain_without_theme() {
        assert_eq!(
            render_prefix("INFO", "*:a", &ThemeTable::empty()),
            "[INFO][*:a]"
        );
    }

    #[test]
    fn prefix_decorates_themed_level_only() {
        let themes = ThemeTable::default();
        let themed = render_prefix("WARN", "*:a", &themes);
        let theme = themes.get("WARN").expect("WARN theme");
        assert_eq!(themed, format!("{}[*:a]", colorize("[WARN]", theme)));
        assert_eq!(render_prefix("AUDIT", "*:a", &themes), "[AUDIT][*:a]");

        let mut custom = ThemeTable::empty();
        custom.insert("AUDIT", Theme::new(Rgb(0, 0, 255), Rgb(255, 255, 255)));
        assert_ne!(render_prefix("AUDIT", "*:a", &custom), "[AUDIT][*:a]");
    }

    #[test]
    fn noop_swallows_everything() {
        let call = BoundCall::noop();
        assert!(call.is_noop());
        assert!(call.prefix().is_none());
        call.call(format_args!("ignored"));
        call.call_all(&[&1, &"two"]);
        assert_eq!(format!("{call:?}"), "BoundCall(noop)");
    }

    #[test]
    fn call_all_joins_with_spaces() {
        let (ctx, capture) = capture_context();
        let logger = ctx.get_logger("join");
        logger.call("warn").call_all(&[&"user", &42, &'x']);
        assert_eq!(capture.drain()[0].message, "user 42 x");
    }

    #[test]
    fn emit_forwards_single_message() {
        let (ctx, capture) = capture_context();
        ctx.get_logger("emit").call("error").emit("boom");
        let lines = capture.drain();
        assert_eq!(lines[0].rendered(), "[ERROR][*:emit] boom");
    }

    #[test]
    fn dynamic_call_prefix_uses_canonical_name() {
        let (ctx, _) = capture_context();
        let call = ctx.get_logger("case").call("wArN");
        assert_eq!(call.prefix(), Some("[WARN][*:case]"));
    }

    #[test]
    fn custom_level_dispatches_to_its_own_sink() {
        let (ctx, capture) = capture_context();
        let audit = CaptureSink::new();
        let sink = shared(audit.clone());
        ctx.define_level("AUDIT", "WARN", Relation::Above, sink, false);

        let logger = ctx.get_logger("custom");
        logger.call("audit").emit("login");
        logger.as_level("Audit").expect("AUDIT defined").emit("logout");

        assert!(capture.is_empty());
        let lines = audit.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].prefix, "[AUDIT][*:custom]");
    }

    #[test]
    fn default_level_follows_registry_changes() {
        let (ctx, capture) = capture_context();
        let logger = ctx.get_logger("late");
        logger.set_level("audit");
        assert!(logger.log().is_noop());

        let audit = CaptureSink::new();
        let sink = shared(audit.clone());
        ctx.define_level("AUDIT", "WARN", Relation::Above, sink, false);
        logger.log().emit("now defined");
        assert!(capture.is_empty());
        assert_eq!(audit.drain()[0].rendered(), "[AUDIT][*:late] now defined");

        logger.set_level("warn");
        logger.set_min_level("warn");
        ctx.define_level("NOTICE", "WARN", Relation::Below, shared(audit), false);
        logger.log().emit("still at threshold");
        assert_eq!(capture.drain()[0].message, "still at threshold");
    }

    #[test]
    fn free_invoke_matches_method() {
        let (ctx, capture) = capture_context();
        let logger = ctx.get_logger("free");
        invoke(&logger, "info", format_args!("{}-{}", 1, 2));
        assert_eq!(capture.drain()[0].message, "1-2");
    }

    #[test]
    fn unknown_dynamic_level_respects_disabled_flag() {
        let (ctx, capture) = capture_context();
        let logger = ctx.get_logger("off");
        logger.set_enabled(false);
        assert!(logger.call("bogus").is_noop());
        logger.invoke("bogus", format_args!("dropped"));
        assert!(capture.is_empty());
    }
}
