//! crates/logtree/src/tree.rs
//! Namespace tree: memoized logger creation and path resolution.
//!
//! Every logger owns its children through a map keyed by path segment, so a
//! full namespace maps to exactly one [`Logger`] instance. Lookups return
//! [`Arc`] handles; two lookups of the same namespace compare equal under
//! [`Arc::ptr_eq`].
//!
//! Path forms accepted by [`Logger::get_logger`]:
//!
//! - `"*"` is the root itself; `"*:a:b"` walks from the root.
//! - `"a:b"` walks from the current logger, one segment at a time.
//! - `"a"` is a direct child of the current logger.
//!
//! Configuration passed to a lookup applies to every node the lookup creates.
//! Nodes that already exist keep the settings they were created with.
//!
//! Children reach the root through a [`Weak`] handle, so the tree is freed
//! once its [`Context`](crate::Context) and every outside handle are gone.

use std::fmt;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

use logtree_sink::ThemeTable;
use rustc_hash::FxHashMap;

use crate::config::NamespaceConfig;
use crate::dispatch::render_prefix;
use crate::severity::{DEFAULT_LEVEL, DEFAULT_MIN_LEVEL, HandlerSnapshot, SeverityRegistry};

/// Namespace of the root logger.
pub const ROOT_NAMESPACE: &str = "*";
/// Delimiter between namespace segments.
pub const SEPARATOR: char = ':';

/// Creation-time settings for a logger. Unset fields use the defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LoggerConfig {
    /// Default level used by [`Logger::log`]. Defaults to `LOG`.
    pub level: Option<String>,
    /// Threshold below which calls are suppressed. Defaults to `INFO`.
    pub min_level: Option<String>,
    /// Initial enabled flag. Defaults to `true`.
    pub enabled: Option<bool>,
}

impl LoggerConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default level.
    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Sets the threshold level.
    #[must_use]
    pub fn min_level(mut self, min_level: impl Into<String>) -> Self {
        self.min_level = Some(min_level.into());
        self
    }

    /// Sets the initial enabled flag.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// State shared by every logger of one context.
pub(crate) struct Shared {
    pub(crate) severities: SeverityRegistry,
    pub(crate) namespaces: NamespaceConfig,
    pub(crate) themes: ThemeTable,
}

/// Mutable per-logger settings, guarded by one lock.
///
/// Levels are kept by name; their ranks live in the registry and are looked
/// up on every gate check.
pub(crate) struct LoggerState {
    pub(crate) level: String,
    pub(crate) level_prefix: String,
    pub(crate) min_level: String,
    pub(crate) enabled: bool,
}

/// Node of the namespace tree.
///
/// A logger carries its full namespace, a default level, a threshold level,
/// and an enabled flag. Logging calls are resolved through the methods in
/// the call-site resolver (`call`, `as_level`, `log`, and the named
/// accessors).
pub struct Logger {
    namespace: String,
    pub(crate) shared: Arc<Shared>,
    root: Option<Weak<Logger>>,
    state: RwLock<LoggerState>,
    children: Mutex<FxHashMap<String, Arc<Logger>>>,
}

impl Logger {
    /// Builds an uncached logger for `namespace`.
    ///
    /// Precedence for `min_level` and `enabled`: namespace override, global
    /// `"*"` override, `config`, built-in default.
    pub(crate) fn create(
        namespace: String,
        shared: Arc<Shared>,
        root: Option<Weak<Self>>,
        config: Option<&LoggerConfig>,
    ) -> Self {
        let config = config.cloned().unwrap_or_default();
        let overrides = shared.namespaces.effective(&namespace);

        let level = config.level.as_deref().unwrap_or(DEFAULT_LEVEL);
        let min_level = overrides
            .min_level
            .as_deref()
            .or(config.min_level.as_deref())
            .unwrap_or(DEFAULT_MIN_LEVEL);
        let enabled = overrides.enabled.or(config.enabled).unwrap_or(true);

        let state = Self::initial_state(&shared, &namespace, level, min_level, enabled);
        tracing::debug!(
            target: "logtree::tree",
            namespace = %namespace,
            default_level = %state.level,
            min_level = %state.min_level,
            enabled,
            "created logger"
        );

        Self {
            namespace,
            shared,
            root,
            state: RwLock::new(state),
            children: Mutex::new(FxHashMap::default()),
        }
    }

    fn initial_state(
        shared: &Shared,
        namespace: &str,
        level: &str,
        min_level: &str,
        enabled: bool,
    ) -> LoggerState {
        let level = level.to_ascii_uppercase();
        let min_level = min_level.to_ascii_uppercase();
        note_unknown(&shared.severities, namespace, &level);
        note_unknown(&shared.severities, namespace, &min_level);
        LoggerState {
            level_prefix: render_prefix(&level, namespace, &shared.themes),
            level,
            min_level,
            enabled,
        }
    }

    /// Returns the logger for `path`, creating missing nodes with default
    /// settings.
    pub fn get_logger(self: &Arc<Self>, path: &str) -> Arc<Self> {
        self.resolve_path(path, None)
    }

    /// Returns the logger for `path`; `config` applies to every node this call
    /// creates along the way.
    pub fn get_logger_with(self: &Arc<Self>, path: &str, config: &LoggerConfig) -> Arc<Self> {
        self.resolve_path(path, Some(config))
    }

    fn resolve_path(self: &Arc<Self>, path: &str, config: Option<&LoggerConfig>) -> Arc<Self> {
        if let Some(rest) = path.strip_prefix(ROOT_NAMESPACE) {
            return Self::walk(self.root_handle(), rest, config);
        }
        if path.contains(SEPARATOR) {
            return Self::walk(Arc::clone(self), path, config);
        }
        if path.is_empty() {
            return Arc::clone(self);
        }
        self.child_or_create(path, config)
    }

    fn walk(start: Arc<Self>, path: &str, config: Option<&LoggerConfig>) -> Arc<Self> {
        let mut node = start;
        for segment in path.split(SEPARATOR).filter(|segment| !segment.is_empty()) {
            node = node.child_or_create(segment, config);
        }
        node
    }

    fn child_or_create(
        self: &Arc<Self>,
        segment: &str,
        config: Option<&LoggerConfig>,
    ) -> Arc<Self> {
        let mut children = self.children();
        if let Some(child) = children.get(segment) {
            return Arc::clone(child);
        }

        let namespace = format!("{}{SEPARATOR}{segment}", self.namespace);
        let child = Arc::new(Self::create(
            namespace,
            Arc::clone(&self.shared),
            Some(self.root_link()),
            config,
        ));
        children.insert(segment.to_owned(), Arc::clone(&child));
        child
    }

    fn root_link(self: &Arc<Self>) -> Weak<Self> {
        match &self.root {
            Some(root) => Weak::clone(root),
            None => Arc::downgrade(self),
        }
    }

    /// The root of this tree. Once the root is gone, absolute paths resolve
    /// against a fresh detached root sharing the same registry.
    fn root_handle(self: &Arc<Self>) -> Arc<Self> {
        let Some(root) = &self.root else {
            return Arc::clone(self);
        };
        root.upgrade().unwrap_or_else(|| {
            tracing::debug!(
                target: "logtree::tree",
                namespace = %self.namespace,
                "root dropped, resolving against a detached root"
            );
            Arc::new(Self::create(
                ROOT_NAMESPACE.to_owned(),
                Arc::clone(&self.shared),
                None,
                None,
            ))
        })
    }

    /// Full namespace, starting with `*`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Reports whether this is the root logger.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.root.is_none()
    }

    /// Current default level name, upper-cased.
    #[must_use]
    pub fn level(&self) -> String {
        self.state().level.clone()
    }

    /// Changes the default level used by [`Logger::log`].
    ///
    /// Unknown names keep their spelling but take the rank and sink of the
    /// default level.
    pub fn set_level(&self, name: &str) {
        let level = name.to_ascii_uppercase();
        note_unknown(&self.shared.severities, &self.namespace, &level);
        let prefix = render_prefix(&level, &self.namespace, &self.shared.themes);

        let mut state = self.state_mut();
        state.level_prefix = prefix;
        state.level = level;
    }

    /// Current threshold level name, upper-cased.
    #[must_use]
    pub fn min_level(&self) -> String {
        self.state().min_level.clone()
    }

    /// Current rank of the threshold level in the registry.
    #[must_use]
    pub fn min_rank(&self) -> u32 {
        let min_level = self.state().min_level.clone();
        self.shared.severities.rank_of(&min_level)
    }

    /// Changes the threshold level.
    ///
    /// Unknown names keep their spelling but take the rank of the default level.
    pub fn set_min_level(&self, name: &str) {
        let min_level = name.to_ascii_uppercase();
        note_unknown(&self.shared.severities, &self.namespace, &min_level);
        self.state_mut().min_level = min_level;
    }

    /// The gate: enabled, and `rank` not below the threshold's current rank.
    pub(crate) fn admits(&self, rank: u32) -> bool {
        let state = self.state();
        state.enabled && rank >= self.shared.severities.rank_of(&state.min_level)
    }

    /// Current enabled flag.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.state().enabled
    }

    /// Changes the enabled flag.
    ///
    /// Namespaces forced off by the namespace configuration stay disabled;
    /// the call is silently ignored for them.
    pub fn set_enabled(&self, enabled: bool) {
        if self.shared.namespaces.forces_disabled(&self.namespace) {
            tracing::debug!(
                target: "logtree::tree",
                namespace = %self.namespace,
                "namespace configuration keeps logger disabled"
            );
            self.state_mut().enabled = false;
            return;
        }
        self.state_mut().enabled = enabled;
    }

    /// Copy of the severity registry this logger dispatches through.
    #[must_use]
    pub fn handlers(&self) -> HandlerSnapshot {
        self.shared.severities.handlers()
    }

    /// Returns the memoized direct child named `segment`, without creating it.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<Arc<Self>> {
        self.children().get(segment).cloned()
    }

    /// Returns the segment names of the direct children, sorted.
    #[must_use]
    pub fn child_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.children().keys().cloned().collect();
        names.sort();
        names
    }

    /// Counts every logger below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        let children: Vec<Arc<Self>> = self.children().values().cloned().collect();
        children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    pub(crate) fn state(&self) -> RwLockReadGuard<'_, LoggerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, LoggerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn children(&self) -> MutexGuard<'_, FxHashMap<String, Arc<Self>>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn note_unknown(severities: &SeverityRegistry, namespace: &str, level: &str) {
    if !severities.contains(level) {
        tracing::debug!(
            target: "logtree::tree",
            namespace = %namespace,
            severity = %level,
            "unknown level, ranked as {DEFAULT_LEVEL}"
        );
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("level", &state.level)
            .field("min_level", &state.min_level)
            .field("enabled", &state.enabled)
            .finish_non_exhaustive()
    }
}
