//! Integration tests for persisted per-namespace overrides.

use std::fs;

use logtree::{
    BaselineSinks, Context, FileStore, LoggerConfig, MemoryStore, NAMESPACE_CONFIG_KEY,
    NamespaceConfig, NamespaceOverride,
};
use logtree_sink::CaptureSink;

fn context_with(raw: &str) -> (Context, CaptureSink) {
    let capture = CaptureSink::new();
    let store = MemoryStore::new().with(NAMESPACE_CONFIG_KEY, raw);
    let ctx = Context::builder()
        .store(&store)
        .sinks(BaselineSinks::capture(&capture))
        .plain()
        .build()
        .expect("context");
    (ctx, capture)
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn namespace_override_beats_creation_config() {
    let (ctx, _) = context_with(r#"{"*:svc": {"minLevel": "error"}}"#);
    let logger = ctx.get_logger_with("svc", &LoggerConfig::new().min_level("debug"));
    assert_eq!(logger.min_level(), "ERROR");
}

#[test]
fn global_override_beats_creation_config() {
    let (ctx, _) = context_with(r#"{"*": {"minLevel": "warn"}}"#);
    let logger = ctx.get_logger_with("svc", &LoggerConfig::new().min_level("trace"));
    assert_eq!(logger.min_level(), "WARN");
}

#[test]
fn namespace_override_beats_global_override() {
    let json = r#"{"*": {"minLevel": "warn"}, "*:svc": {"minLevel": "debug"}}"#;
    let (ctx, _) = context_with(json);
    assert_eq!(ctx.get_logger("svc").min_level(), "DEBUG");
    assert_eq!(ctx.get_logger("other").min_level(), "WARN");
}

#[test]
fn creation_config_applies_when_no_override() {
    let (ctx, _) = context_with(r#"{"*:elsewhere": {"minLevel": "fatal"}}"#);
    let logger = ctx.get_logger_with("svc", &LoggerConfig::new().min_level("warn"));
    assert_eq!(logger.min_level(), "WARN");
}

#[test]
fn default_level_is_not_overridable_by_namespace_config() {
    let (ctx, _) = context_with(r#"{"*:svc": {"minLevel": "error"}}"#);
    let logger = ctx.get_logger_with("svc", &LoggerConfig::new().level("warn"));
    assert_eq!(logger.level(), "WARN");
}

// ============================================================================
// Enabled veto
// ============================================================================

#[test]
fn forced_off_namespace_cannot_be_enabled() {
    let (ctx, capture) = context_with(r#"{"*:noisy": {"enabled": false}}"#);
    let logger = ctx.get_logger_with("noisy", &LoggerConfig::new().enabled(true));
    assert!(!logger.enabled());

    logger.set_enabled(true);
    assert!(!logger.enabled());
    logger.fatal().expect("FATAL").emit("never");
    assert!(capture.is_empty());
}

#[test]
fn veto_does_not_leak_to_children() {
    let (ctx, capture) = context_with(r#"{"*:noisy": {"enabled": false}}"#);
    let child = ctx.get_logger("noisy:child");
    assert!(child.enabled());
    child.warn().expect("WARN").emit("heard");
    assert_eq!(capture.len(), 1);
}

#[test]
fn explicit_enabled_true_override_allows_toggling() {
    let (ctx, _) = context_with(r#"{"*:svc": {"enabled": true}}"#);
    let logger = ctx.get_logger_with("svc", &LoggerConfig::new().enabled(false));
    assert!(logger.enabled());
    logger.set_enabled(false);
    assert!(!logger.enabled());
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn malformed_configuration_means_no_overrides() {
    let (ctx, _) = context_with("[1, 2, 3]");
    assert!(ctx.namespaces().is_empty());
    let logger = ctx.get_logger("svc");
    assert_eq!(logger.min_level(), "INFO");
    assert!(logger.enabled());
}

#[test]
fn file_store_feeds_the_builder() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(NAMESPACE_CONFIG_KEY),
        r#"{"disk": {"minLevel": "fatal", "enabled": false}}"#,
    )
    .expect("write config");

    let ctx = Context::builder()
        .store(&FileStore::new(dir.path()))
        .plain()
        .build()
        .expect("context");
    let logger = ctx.get_logger("disk");
    assert_eq!(logger.min_level(), "FATAL");
    assert!(!logger.enabled());
}

#[test]
fn programmatic_configuration_is_accepted() {
    let config: NamespaceConfig = [(
        "api".to_owned(),
        NamespaceOverride {
            min_level: Some("trace".into()),
            enabled: None,
        },
    )]
    .into_iter()
    .collect();

    let ctx = Context::builder()
        .namespaces(config)
        .plain()
        .build()
        .expect("context");
    assert_eq!(ctx.get_logger("api").min_level(), "TRACE");
}
