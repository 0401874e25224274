//! Console-method sinks used by the default severity ladder.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::sink::Sink;

/// Standard stream a [`ConsoleSink`] writes to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConsoleStream {
    /// Process standard output.
    Stdout,
    /// Process standard error.
    Stderr,
}

/// Console method a severity level is wired to.
///
/// The baseline ladder binds TRACE..ERROR to the method of the same name and
/// FATAL to [`ConsoleMethod::Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ConsoleMethod {
    /// `trace` output, written to stderr.
    Trace,
    /// `debug` output.
    Debug,
    /// Plain `log` output.
    Log,
    /// `info` output.
    Info,
    /// `warn` output, written to stderr.
    Warn,
    /// `error` output, written to stderr.
    Error,
}

/// Error returned when a console method name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("Invalid console method name: {0}")]
pub struct InvalidConsoleMethod(pub String);

impl ConsoleMethod {
    /// Every console method, in ladder order.
    pub const ALL: [Self; 6] = [
        Self::Trace,
        Self::Debug,
        Self::Log,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    /// Returns the lower-case method name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Returns the stream the method writes to.
    #[must_use]
    pub const fn stream(self) -> ConsoleStream {
        match self {
            Self::Debug | Self::Log | Self::Info => ConsoleStream::Stdout,
            Self::Trace | Self::Warn | Self::Error => ConsoleStream::Stderr,
        }
    }
}

impl FromStr for ConsoleMethod {
    type Err = InvalidConsoleMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| s.eq_ignore_ascii_case(method.name()))
            .ok_or_else(|| InvalidConsoleMethod(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sink that writes `"{prefix} {message}"` lines to stdout or stderr.
///
/// Each line is written under the stream lock, so lines from different
/// threads never interleave.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConsoleSink {
    method: ConsoleMethod,
}

impl ConsoleSink {
    /// Creates a sink bound to `method`.
    #[must_use]
    pub const fn new(method: ConsoleMethod) -> Self {
        Self { method }
    }

    /// Returns the console method this sink emulates.
    #[must_use]
    pub const fn method(&self) -> ConsoleMethod {
        self.method
    }

    /// Returns the stream this sink writes to.
    #[must_use]
    pub const fn stream(&self) -> ConsoleStream {
        self.method.stream()
    }
}

impl From<ConsoleMethod> for ConsoleSink {
    fn from(method: ConsoleMethod) -> Self {
        Self::new(method)
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, prefix: &str, args: fmt::Arguments<'_>) {
        let _ = match self.stream() {
            ConsoleStream::Stdout => writeln!(io::stdout().lock(), "{prefix} {args}"),
            ConsoleStream::Stderr => writeln!(io::stderr().lock(), "{prefix} {args}"),
        };
    }
}
