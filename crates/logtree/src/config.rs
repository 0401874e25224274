//! crates/logtree/src/config.rs
//! Per-namespace overrides loaded once from a key-value store.
//!
//! The store holds one JSON object under [`NAMESPACE_CONFIG_KEY`]:
//!
//! ```json
//! { "*": { "minLevel": "warn" }, "*:net:tcp": { "enabled": false } }
//! ```
//!
//! Keys are full namespaces. A key that does not start with the root sentinel
//! is read relative to the root, so `"net:tcp"` and `"*:net:tcp"` are the same
//! entry. Absent or malformed data means "no overrides".

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::{env, fmt, io};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::tree::{ROOT_NAMESPACE, SEPARATOR};

/// Key under which the namespace configuration is stored.
pub const NAMESPACE_CONFIG_KEY: &str = "LOGGING_NAMESPACE_CONFIG";

/// Source of persisted configuration values.
pub trait ConfigStore {
    /// Returns the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;
}

/// Reads values from environment variables named after the key.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvStore;

impl ConfigStore for EnvStore {
    fn read(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Store without any value.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStore;

impl ConfigStore for NoStore {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }
}

/// In-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Stores `value` under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Reads each key from a file of the same name inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory the store reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ConfigStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.dir.join(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(
                    target: "logtree::config",
                    path = %path.display(),
                    error = %err,
                    "cannot read namespace configuration"
                );
                None
            }
        }
    }
}

/// Override for one namespace. Absent fields defer to the next layer.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NamespaceOverride {
    /// Threshold level name.
    #[serde(
        rename = "minLevel",
        alias = "min_level",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub min_level: Option<String>,
    /// Forces the enabled flag. `Some(false)` also vetoes later enabling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl NamespaceOverride {
    fn or(self, fallback: Option<&Self>) -> Self {
        match fallback {
            Some(fallback) => Self {
                min_level: self.min_level.or_else(|| fallback.min_level.clone()),
                enabled: self.enabled.or(fallback.enabled),
            },
            None => self,
        }
    }
}

/// Loaded namespace overrides, keyed by normalised full namespace.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct NamespaceConfig {
    entries: FxHashMap<String, NamespaceOverride>,
}

impl NamespaceConfig {
    /// Configuration without overrides.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the configuration stored under [`NAMESPACE_CONFIG_KEY`].
    ///
    /// Missing values yield an empty configuration; malformed values are
    /// logged and also yield an empty configuration.
    pub fn load(store: &dyn ConfigStore) -> Self {
        let Some(raw) = store.read(NAMESPACE_CONFIG_KEY) else {
            return Self::empty();
        };
        match Self::parse(&raw) {
            Ok(config) => {
                tracing::debug!(
                    target: "logtree::config",
                    entries = config.len(),
                    "loaded namespace configuration"
                );
                config
            }
            Err(err) => {
                tracing::warn!(
                    target: "logtree::config",
                    error = %err,
                    "ignoring namespace configuration"
                );
                Self::empty()
            }
        }
    }

    /// Parses a JSON object mapping namespaces to overrides.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parsed: HashMap<String, NamespaceOverride> = serde_json::from_str(raw)?;
        Ok(parsed.into_iter().collect())
    }

    /// Adds or replaces the override for `namespace`.
    pub fn insert(&mut self, namespace: &str, entry: NamespaceOverride) {
        self.entries.insert(normalize_key(namespace), entry);
    }

    /// Returns the override stored for exactly `namespace`.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&NamespaceOverride> {
        self.entries.get(&normalize_key(namespace))
    }

    /// Returns the effective override for `namespace`: its own fields, each
    /// missing field taken from the global `"*"` entry.
    #[must_use]
    pub fn effective(&self, namespace: &str) -> NamespaceOverride {
        let global = self.entries.get(ROOT_NAMESPACE);
        self.get(namespace).cloned().unwrap_or_default().or(global)
    }

    /// Reports whether `namespace` is forced disabled.
    #[must_use]
    pub fn forces_disabled(&self, namespace: &str) -> bool {
        self.effective(namespace).enabled == Some(false)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no override is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, NamespaceOverride)> for NamespaceConfig {
    fn from_iter<I: IntoIterator<Item = (String, NamespaceOverride)>>(iter: I) -> Self {
        let mut config = Self::empty();
        for (namespace, entry) in iter {
            config.insert(&namespace, entry);
        }
        config
    }
}

impl fmt::Debug for NamespaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        f.debug_struct("NamespaceConfig")
            .field("namespaces", &keys)
            .finish()
    }
}

fn normalize_key(namespace: &str) -> String {
    if namespace.starts_with(ROOT_NAMESPACE) {
        namespace.to_owned()
    } else {
        format!("{ROOT_NAMESPACE}{SEPARATOR}{namespace}")
    }
}
