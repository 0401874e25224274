use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Sink;
use crate::line_mode::LineMode;

/// Sink that streams `"{prefix} {message}"` lines into an [`io::Write`] target.
///
/// The writer sits behind a mutex so one sink can be shared by every level of
/// a registry. Each call renders the prefix and the arguments in a single
/// locked section, so concurrent callers never interleave within a line.
///
/// # Examples
///
/// ```
/// use logtree_sink::{LineMode, Sink, WriterSink};
///
/// let sink = WriterSink::new(Vec::new());
/// sink.emit("[INFO][*:db]", format_args!("pool ready"));
/// sink.emit("[WARN][*:db]", format_args!("{} slow queries", 3));
///
/// let output = String::from_utf8(sink.into_inner()).unwrap();
/// assert_eq!(output, "[INFO][*:db] pool ready\n[WARN][*:db] 3 slow queries\n");
///
/// let bare = WriterSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
/// bare.emit("[LOG][*]", format_args!("tick"));
/// assert_eq!(bare.into_inner(), b"[LOG][*] tick".to_vec());
/// ```
pub struct WriterSink<W> {
    writer: Mutex<W>,
    line_mode: LineMode,
}

impl<W> WriterSink<W> {
    /// Creates a sink that terminates every line with a newline.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self::with_line_mode(writer, LineMode::WithNewline)
    }

    /// Creates a sink with the provided [`LineMode`].
    #[must_use]
    pub const fn with_line_mode(writer: W, line_mode: LineMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            line_mode,
        }
    }

    /// Returns the configured [`LineMode`].
    #[must_use]
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Consumes the sink and returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> WriterSink<W>
where
    W: Write,
{
    fn write_line(&self, prefix: &str, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut writer = self.lock();
        write!(writer, "{prefix} {args}")?;
        if self.line_mode.append_newline() {
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl<W> Sink for WriterSink<W>
where
    W: Write + Send,
{
    fn emit(&self, prefix: &str, args: fmt::Arguments<'_>) {
        // Sinks are fire-and-forget; a failing writer must not reach the caller.
        let _ = self.write_line(prefix, args);
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}
