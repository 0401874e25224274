#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logtree-sink/src/lib.rs
//!
//! # Overview
//!
//! `logtree-sink` provides the output collaborators consumed by the `logtree`
//! severity registry. A severity level owns exactly one [`Sink`]; when a
//! logging call passes its gate the sink receives the rendered prefix
//! (`[LEVEL][namespace]`) together with the caller's formatted arguments.
//!
//! # Design
//!
//! - [`Sink`] is the opaque handler seam. Any
//!   `Fn(&str, fmt::Arguments<'_>) + Send + Sync` closure is a sink, so callers
//!   can wire custom levels without defining new types.
//! - [`WriterSink`] streams lines into an [`std::io::Write`] target and
//!   honours a [`LineMode`].
//! - [`ConsoleSink`] routes each [`ConsoleMethod`] to stdout or stderr.
//! - [`CaptureSink`] records every emitted line so tests can assert on sink
//!   output with [`CaptureSink::drain`].
//! - [`ThemeTable`] and [`colorize`] decorate level names with 24-bit ANSI
//!   colours. The exact escape sequence is presentation detail.
//!
//! # Invariants
//!
//! - Sinks never fail from the caller's point of view. Write errors are
//!   dropped, matching the fire-and-forget contract of the logging core.
//! - `LineMode::WithNewline` terminates each emitted line.
//!
//! # Examples
//!
//! ```
//! use logtree_sink::{CaptureSink, Sink};
//!
//! let sink = CaptureSink::new();
//! sink.emit("[INFO][*:net]", format_args!("listening on {}", 8080));
//!
//! let lines = sink.drain();
//! assert_eq!(lines[0].prefix, "[INFO][*:net]");
//! assert_eq!(lines[0].message, "listening on 8080");
//! ```

mod capture;
mod console;
mod line_mode;
mod sink;
mod theme;

pub use capture::{CaptureSink, CapturedLine};
pub use console::{ConsoleMethod, ConsoleSink, ConsoleStream, InvalidConsoleMethod};
pub use line_mode::LineMode;
pub use sink::{SharedSink, Sink, WriterSink, shared};
pub use theme::{Rgb, Theme, ThemeTable, colorize};
