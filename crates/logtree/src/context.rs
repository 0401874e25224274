//! crates/logtree/src/context.rs
//! Logging context: one severity registry, one namespace configuration and
//! one logger tree, built once and shared by every logger of the tree.

use std::fmt;
use std::sync::Arc;

use logtree_sink::{SharedSink, ThemeTable};

use crate::config::{ConfigStore, EnvStore, NamespaceConfig};
use crate::error::LoggingError;
use crate::severity::{BaselineSinks, HandlerSnapshot, Relation, SeverityRegistry};
use crate::tree::{Logger, LoggerConfig, ROOT_NAMESPACE, Shared};

/// Environment variable that turns colour themes off when set.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Owner of a logger tree and the state its loggers share.
///
/// Loggers hold their root weakly, so dropping the context frees every node
/// nobody else holds. Surviving handles stay usable; absolute lookups made
/// through them resolve against a detached root.
pub struct Context {
    shared: Arc<Shared>,
    root: Arc<Logger>,
}

impl Context {
    /// Starts a builder with console sinks, the default palette and no
    /// namespace configuration.
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Builds a context from the process environment.
    ///
    /// Namespace overrides come from the `LOGGING_NAMESPACE_CONFIG` variable;
    /// themes are dropped when `NO_COLOR` is set.
    pub fn from_env() -> Result<Self, LoggingError> {
        let mut builder = Self::builder().store(&EnvStore);
        if std::env::var_os(NO_COLOR_ENV).is_some() {
            builder = builder.plain();
        }
        builder.build()
    }

    /// Root logger, namespace `*`.
    #[must_use]
    pub const fn root(&self) -> &Arc<Logger> {
        &self.root
    }

    /// Returns the logger for `path`, resolved from the root.
    pub fn get_logger(&self, path: &str) -> Arc<Logger> {
        self.root.get_logger(path)
    }

    /// Returns the logger for `path`; `config` applies to the nodes this call
    /// creates.
    pub fn get_logger_with(&self, path: &str, config: &LoggerConfig) -> Arc<Logger> {
        self.root.get_logger_with(path, config)
    }

    /// Severity registry shared by the tree.
    #[must_use]
    pub fn severities(&self) -> &SeverityRegistry {
        &self.shared.severities
    }

    /// Namespace configuration loaded at build time.
    #[must_use]
    pub fn namespaces(&self) -> &NamespaceConfig {
        &self.shared.namespaces
    }

    /// Theme table applied to level labels.
    #[must_use]
    pub fn themes(&self) -> &ThemeTable {
        &self.shared.themes
    }

    /// Registers a level relative to `sibling`.
    ///
    /// See [`SeverityRegistry::define_relative`] for the placement rules.
    /// Existing loggers keep their level names and compare them at the ranks
    /// the registry holds after the insertion.
    pub fn define_level(
        &self,
        name: &str,
        sibling: &str,
        relation: Relation,
        handler: SharedSink,
        override_existing: bool,
    ) -> Option<u32> {
        self.shared
            .severities
            .define_relative(name, sibling, relation, handler, override_existing)
    }

    /// Copy of the severity registry.
    #[must_use]
    pub fn handlers(&self) -> HandlerSnapshot {
        self.shared.severities.handlers()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("severities", &self.shared.severities)
            .field("namespaces", &self.shared.namespaces)
            .field("loggers", &(self.root.descendant_count() + 1))
            .finish()
    }
}

/// Builder for [`Context`].
#[derive(Debug, Default)]
pub struct ContextBuilder {
    namespaces: Option<NamespaceConfig>,
    sinks: BaselineSinks,
    themes: Option<ThemeTable>,
}

impl ContextBuilder {
    /// Loads the namespace configuration from `store`.
    #[must_use]
    pub fn store(mut self, store: &dyn ConfigStore) -> Self {
        self.namespaces = Some(NamespaceConfig::load(store));
        self
    }

    /// Uses an already parsed namespace configuration.
    #[must_use]
    pub fn namespaces(mut self, namespaces: NamespaceConfig) -> Self {
        self.namespaces = Some(namespaces);
        self
    }

    /// Sinks of the baseline levels.
    #[must_use]
    pub fn sinks(mut self, sinks: BaselineSinks) -> Self {
        self.sinks = sinks;
        self
    }

    /// Theme table applied to level labels.
    #[must_use]
    pub fn themes(mut self, themes: ThemeTable) -> Self {
        self.themes = Some(themes);
        self
    }

    /// Disables level decoration.
    #[must_use]
    pub fn plain(self) -> Self {
        self.themes(ThemeTable::empty())
    }

    /// Bootstraps the severity ladder and creates the root logger.
    pub fn build(self) -> Result<Context, LoggingError> {
        let severities = SeverityRegistry::bootstrap(self.sinks)?;
        let shared = Arc::new(Shared {
            severities,
            namespaces: self.namespaces.unwrap_or_default(),
            themes: self.themes.unwrap_or_default(),
        });
        let root = Arc::new(Logger::create(
            ROOT_NAMESPACE.to_owned(),
            Arc::clone(&shared),
            None,
            None,
        ));
        tracing::debug!(
            target: "logtree::config",
            namespaces = shared.namespaces.len(),
            themed = !shared.themes.is_empty(),
            "built logging context"
        );
        Ok(Context { shared, root })
    }
}

#[cfg(test)]
mod tests {
    use logtree_sink::CaptureSink;

    use super::*;
    use crate::config::{MemoryStore, NAMESPACE_CONFIG_KEY};

    #[test]
    fn builder_loads_namespace_config_from_store() {
        let json = r#"{"*:quiet": {"enabled": false}}"#;
        let store = MemoryStore::new().with(NAMESPACE_CONFIG_KEY, json);
        let ctx = Context::builder()
            .store(&store)
            .plain()
            .build()
            .expect("context");
        assert_eq!(ctx.namespaces().len(), 1);
        assert!(!ctx.get_logger("quiet").enabled());
        assert!(ctx.get_logger("loud").enabled());
    }

    #[test]
    fn default_builder_keeps_palette() {
        let ctx = Context::builder().build().expect("context");
        assert!(!ctx.themes().is_empty());
        let plain = Context::builder().plain().build().expect("context");
        assert!(plain.themes().is_empty());
    }

    #[test]
    fn root_applies_global_override() {
        let json = r#"{"*": {"minLevel": "error"}}"#;
        let store = MemoryStore::new().with(NAMESPACE_CONFIG_KEY, json);
        let ctx = Context::builder().store(&store).build().expect("context");
        assert_eq!(ctx.root().min_level(), "ERROR");
        assert_eq!(ctx.get_logger("any").min_level(), "ERROR");
    }

    #[test]
    fn define_level_is_visible_through_handlers() {
        let capture = CaptureSink::new();
        let ctx = Context::builder()
            .sinks(BaselineSinks::capture(&capture))
            .build()
            .expect("context");
        let sink = logtree_sink::shared(capture);
        let rank = ctx.define_level("NOTICE", "INFO", Relation::Above, sink, false);
        let handlers = ctx.handlers();
        assert_eq!(handlers["NOTICE"].rank(), rank.expect("defined"));
        assert!(handlers["WARN"].rank() > handlers["NOTICE"].rank());
    }

    #[test]
    fn dropping_context_frees_the_tree() {
        let ctx = Context::builder().plain().build().expect("context");
        let root = Arc::downgrade(ctx.root());
        let middle = Arc::downgrade(&ctx.get_logger("a"));
        let leaf = ctx.get_logger("a:b");
        let sibling = leaf.get_logger("*:c");
        assert!(Arc::ptr_eq(&sibling, &ctx.get_logger("c")));

        drop(ctx);
        assert!(root.upgrade().is_none());
        assert!(middle.upgrade().is_none());
        assert_eq!(leaf.namespace(), "*:a:b");
        assert_eq!(sibling.namespace(), "*:c");
    }

    #[test]
    fn surviving_logger_resolves_absolute_paths_after_drop() {
        let capture = CaptureSink::new();
        let ctx = Context::builder()
            .sinks(BaselineSinks::capture(&capture))
            .plain()
            .build()
            .expect("context");
        let leaf = ctx.get_logger("a:b");
        drop(ctx);

        let orphan = leaf.get_logger("*:x");
        assert_eq!(orphan.namespace(), "*:x");
        orphan.invoke("warn", format_args!("still routed"));
        assert_eq!(capture.drain()[0].rendered(), "[WARN][*:x] still routed");

        let child = leaf.get_logger("c");
        assert!(Arc::ptr_eq(&child, &leaf.get_logger("c")));
    }

    #[test]
    fn debug_lists_logger_count() {
        let ctx = Context::builder().plain().build().expect("context");
        let _ = ctx.get_logger("x:y");
        assert!(format!("{ctx:?}").contains("loggers: 3"));
    }
}
