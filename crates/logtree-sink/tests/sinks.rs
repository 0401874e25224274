//! Integration tests for the sink collaborators.

use std::fmt;
use std::sync::Arc;
use std::thread;

use logtree_sink::{
    CaptureSink, ConsoleMethod, ConsoleStream, LineMode, SharedSink, Sink, ThemeTable, WriterSink,
    shared,
};

fn as_sink<F>(f: F) -> F
where
    F: Fn(&str, fmt::Arguments<'_>) + Send + Sync,
{
    f
}

// ============================================================================
// Shared sinks
// ============================================================================

#[test]
fn closures_are_sinks() {
    let capture = CaptureSink::new();
    let forward = capture.clone();
    let sink: SharedSink = shared(as_sink(move |prefix, args| {
        forward.emit(&prefix.to_lowercase(), args);
    }));

    sink.emit("[WARN][*:x]", format_args!("{}", "lowered prefix"));
    assert_eq!(capture.drain()[0].prefix, "[warn][*:x]");
}

#[test]
fn capture_clones_share_one_buffer_across_threads() {
    let capture = CaptureSink::new();
    let sink = shared(capture.clone());

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let sink = Arc::clone(&sink);
            thread::spawn(move || {
                sink.emit("[INFO][*]", format_args!("thread {index}"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread");
    }

    let mut messages: Vec<String> = capture
        .drain()
        .into_iter()
        .map(|line| line.message)
        .collect();
    messages.sort();
    assert_eq!(messages, ["thread 0", "thread 1", "thread 2", "thread 3"]);
    assert!(capture.is_empty());
}

// ============================================================================
// Writer sink
// ============================================================================

#[test]
fn writer_sink_separates_prefix_and_message() {
    let sink = WriterSink::new(Vec::new());
    sink.emit("[INFO][*:a]", format_args!("one"));
    sink.emit("[WARN][*:a]", format_args!("two {}", 2));

    let output = String::from_utf8(sink.into_inner()).expect("utf8");
    assert_eq!(output, "[INFO][*:a] one\n[WARN][*:a] two 2\n");
}

#[test]
fn writer_sink_without_newline() {
    let sink = WriterSink::with_line_mode(Vec::new(), LineMode::WithoutNewline);
    sink.emit("[LOG][*]", format_args!("partial"));
    assert_eq!(sink.into_inner(), b"[LOG][*] partial");
}

// ============================================================================
// Console methods and themes
// ============================================================================

#[test]
fn console_methods_parse_and_route() {
    let method: ConsoleMethod = "WARN".parse().expect("known method");
    assert_eq!(method, ConsoleMethod::Warn);
    assert_eq!(method.stream(), ConsoleStream::Stderr);
    assert_eq!(ConsoleMethod::Info.stream(), ConsoleStream::Stdout);

    let err = "shout".parse::<ConsoleMethod>().unwrap_err();
    assert_eq!(err.to_string(), "Invalid console method name: shout");
}

#[test]
fn default_palette_covers_baseline_levels() {
    let themes = ThemeTable::default();
    for level in [
        "NONE", "TRACE", "DEBUG", "LOG", "INFO", "WARN", "ERROR", "FATAL",
    ] {
        assert!(themes.get(level).is_some(), "{level} has no theme");
        assert_ne!(themes.apply(level, "[X]"), "[X]");
    }
    assert_eq!(themes.apply("CUSTOM", "[CUSTOM]"), "[CUSTOM]");
}
