//! In-memory sink that records emitted lines for later inspection.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::sink::Sink;

/// One line recorded by a [`CaptureSink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedLine {
    /// The rendered `[LEVEL][namespace]` prefix.
    pub prefix: String,
    /// The formatted caller arguments.
    pub message: String,
}

impl CapturedLine {
    /// Returns the line as the console would print it.
    #[must_use]
    pub fn rendered(&self) -> String {
        format!("{} {}", self.prefix, self.message)
    }
}

/// Sink that stores every emitted line in shared memory.
///
/// Clones share the same buffer, so one handle can be registered for several
/// levels while the test keeps another to drain the recorded lines.
#[derive(Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl CaptureSink {
    /// Creates an empty capture buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains all recorded lines, clearing the buffer.
    pub fn drain(&self) -> Vec<CapturedLine> {
        self.lock().drain(..).collect()
    }

    /// Returns the number of lines recorded since the last drain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether nothing was recorded since the last drain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for CaptureSink {
    fn emit(&self, prefix: &str, args: fmt::Arguments<'_>) {
        let line = CapturedLine {
            prefix: prefix.to_owned(),
            message: args.to_string(),
        };
        self.lock().push(line);
    }
}

impl fmt::Debug for CaptureSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSink")
            .field("recorded", &self.len())
            .finish()
    }
}
