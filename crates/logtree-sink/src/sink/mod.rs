use std::fmt;
use std::sync::Arc;

mod writer;

pub use writer::WriterSink;

/// Destination for rendered log lines.
///
/// The logging core hands every call that passes its gate to exactly one sink:
/// the handler registered for the resolved severity level. `prefix` carries the
/// decorated `[LEVEL][namespace]` label and `args` the caller's arguments,
/// forwarded untouched.
///
/// Functions and closures with the matching signature implement the trait
/// directly:
///
/// ```
/// use std::fmt;
/// use logtree_sink::Sink;
///
/// fn to_stdout(prefix: &str, args: fmt::Arguments<'_>) {
///     println!("{prefix} {args}");
/// }
///
/// to_stdout.emit("[WARN][*]", format_args!("disk at {}%", 91));
/// ```
pub trait Sink: Send + Sync {
    /// Emits one line.
    fn emit(&self, prefix: &str, args: fmt::Arguments<'_>);
}

impl<F> Sink for F
where
    F: Fn(&str, fmt::Arguments<'_>) + Send + Sync,
{
    fn emit(&self, prefix: &str, args: fmt::Arguments<'_>) {
        self(prefix, args);
    }
}

/// Reference-counted, type-erased sink as stored by the severity registry.
pub type SharedSink = Arc<dyn Sink>;

/// Erases a concrete sink into a [`SharedSink`].
pub fn shared<S>(sink: S) -> SharedSink
where
    S: Sink + 'static,
{
    Arc::new(sink)
}
