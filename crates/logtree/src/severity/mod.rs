//! crates/logtree/src/severity/mod.rs
//! Severity registry: level names, their sinks, and their relative ranks.
//!
//! Levels are registered relative to an existing anchor. Inserting a level
//! above or below an anchor renumbers every entry at or above the target rank
//! so the ladder stays a strict total order. Ranks are only ever compared with
//! `<`; their absolute values carry no meaning.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use logtree_sink::{SharedSink, shared};
use rustc_hash::FxHashMap;

use crate::error::LoggingError;

mod ladder;

pub use ladder::BaselineSinks;

/// Synthetic zero-rank anchor of the baseline ladder.
pub const NONE_LEVEL: &str = "NONE";
/// Level used when a configured name does not resolve.
pub const DEFAULT_LEVEL: &str = "LOG";
/// Threshold applied to loggers that configure none.
pub const DEFAULT_MIN_LEVEL: &str = "INFO";

/// Registered level: canonical upper-case name, rank and sink.
#[derive(Clone)]
pub struct SeverityLevel {
    name: String,
    rank: u32,
    handler: SharedSink,
}

impl SeverityLevel {
    /// Canonical upper-case name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rank at the time this value was read from the registry.
    #[must_use]
    pub const fn rank(&self) -> u32 {
        self.rank
    }

    /// Sink receiving calls made at this level.
    #[must_use]
    pub const fn handler(&self) -> &SharedSink {
        &self.handler
    }

    /// Stand-in for the default level when a registry was built without one.
    fn detached_default() -> Self {
        fn discard(_prefix: &str, _args: fmt::Arguments<'_>) {}

        Self {
            name: DEFAULT_LEVEL.to_owned(),
            rank: 0,
            handler: shared(discard),
        }
    }
}

impl fmt::Debug for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeverityLevel")
            .field("name", &self.name)
            .field("rank", &self.rank)
            .finish_non_exhaustive()
    }
}

/// Placement of a new level relative to its anchor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum Relation {
    /// Directly below the anchor; the anchor and everything above shift up.
    Below = -1,
    /// Shares the anchor's rank; nothing shifts.
    Same = 0,
    /// Directly above the anchor; everything above the anchor shifts up.
    Above = 1,
}

impl TryFrom<i8> for Relation {
    type Error = LoggingError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Below),
            0 => Ok(Self::Same),
            1 => Ok(Self::Above),
            other => Err(LoggingError::InvalidRelation(other)),
        }
    }
}

/// Point-in-time copy of the registry, keyed by canonical level name.
pub type HandlerSnapshot = BTreeMap<String, SeverityLevel>;

/// Mutable mapping from level name to `(sink, rank)`.
///
/// Every mutation happens under one write lock, so renumbering during an
/// insertion is never observed half-done.
#[derive(Default)]
pub struct SeverityRegistry {
    levels: RwLock<FxHashMap<String, SeverityLevel>>,
}

impl SeverityRegistry {
    /// Creates a registry without any level.
    ///
    /// Most callers want [`SeverityRegistry::bootstrap`], which installs the
    /// baseline ladder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` at an absolute rank, replacing any existing entry.
    pub fn define_at(&self, name: &str, rank: u32, handler: SharedSink) {
        let name = name.to_ascii_uppercase();
        tracing::trace!(target: "logtree::severity", severity = %name, rank, "defining level");
        self.write().insert(
            name.clone(),
            SeverityLevel {
                name,
                rank,
                handler,
            },
        );
    }

    /// Registers `name` relative to `sibling` and returns the assigned rank.
    ///
    /// - [`Relation::Above`] targets `sibling.rank + 1`, [`Relation::Same`]
    ///   and [`Relation::Below`] target `sibling.rank`.
    /// - Unless the relation is [`Relation::Same`], every entry whose rank is
    ///   at or above the target shifts up by one first.
    /// - An unknown `sibling` logs a warning and leaves the registry unchanged.
    /// - A shift that would push a rank past `u32::MAX` is refused the same
    ///   way.
    /// - An existing `name` is kept as is unless `override_existing` is set,
    ///   in which case its sink and rank are replaced.
    ///
    /// Returns `None` when nothing was registered.
    pub fn define_relative(
        &self,
        name: &str,
        sibling: &str,
        relation: Relation,
        handler: SharedSink,
        override_existing: bool,
    ) -> Option<u32> {
        let name = name.to_ascii_uppercase();
        let sibling = sibling.to_ascii_uppercase();
        let mut levels = self.write();

        let Some(anchor) = levels.get(&sibling).map(SeverityLevel::rank) else {
            tracing::warn!(
                target: "logtree::severity",
                severity = %name,
                "No handler named '{sibling}' found"
            );
            return None;
        };

        if levels.contains_key(&name) && !override_existing {
            tracing::debug!(target: "logtree::severity", severity = %name, "level already defined");
            return None;
        }

        let target = match relation {
            Relation::Above => anchor.checked_add(1),
            Relation::Same | Relation::Below => Some(anchor),
        };
        let shifts = relation != Relation::Same;
        let saturated = shifts && levels.values().any(|level| level.rank == u32::MAX);
        let Some(target) = target.filter(|_| !saturated) else {
            tracing::warn!(
                target: "logtree::severity",
                severity = %name,
                anchor = %sibling,
                "rank space exhausted, level not defined"
            );
            return None;
        };

        if shifts {
            for level in levels.values_mut().filter(|level| level.rank >= target) {
                level.rank += 1;
            }
        }

        tracing::trace!(
            target: "logtree::severity",
            severity = %name,
            anchor = %sibling,
            rank = target,
            "defining relative level"
        );
        levels.insert(
            name.clone(),
            SeverityLevel {
                name,
                rank: target,
                handler,
            },
        );
        Some(target)
    }

    /// Case-insensitive lookup without fallback.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<SeverityLevel> {
        self.read().get(&name.to_ascii_uppercase()).cloned()
    }

    /// Case-insensitive lookup that fails with [`LoggingError::UnknownLevel`].
    pub fn require(&self, name: &str) -> Result<SeverityLevel, LoggingError> {
        self.lookup(name)
            .ok_or_else(|| LoggingError::unknown_level(name))
    }

    /// Case-insensitive lookup that falls back to [`DEFAULT_LEVEL`] on a miss.
    ///
    /// A registry that lacks the default level itself yields a detached `LOG`
    /// entry at rank 0 whose sink discards everything.
    #[must_use]
    pub fn resolve(&self, name: &str) -> SeverityLevel {
        let key = name.to_ascii_uppercase();
        let levels = self.read();
        if let Some(level) = levels.get(&key) {
            return level.clone();
        }

        tracing::debug!(
            target: "logtree::severity",
            severity = %key,
            "unknown level, falling back to {DEFAULT_LEVEL}"
        );
        levels
            .get(DEFAULT_LEVEL)
            .cloned()
            .unwrap_or_else(SeverityLevel::detached_default)
    }

    /// Like [`SeverityRegistry::resolve`], without the diagnostic on a miss.
    pub(crate) fn resolve_quiet(&self, name: &str) -> SeverityLevel {
        let levels = self.read();
        levels
            .get(&name.to_ascii_uppercase())
            .or_else(|| levels.get(DEFAULT_LEVEL))
            .cloned()
            .unwrap_or_else(SeverityLevel::detached_default)
    }

    /// Current rank of `name`, or of [`DEFAULT_LEVEL`] when it is unknown.
    ///
    /// Ranks move when levels are inserted; read this at the point of
    /// comparison instead of keeping it.
    #[must_use]
    pub fn rank_of(&self, name: &str) -> u32 {
        let levels = self.read();
        levels
            .get(&name.to_ascii_uppercase())
            .or_else(|| levels.get(DEFAULT_LEVEL))
            .map_or(0, SeverityLevel::rank)
    }

    /// Reports whether `name` is registered, ignoring case.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(&name.to_ascii_uppercase())
    }

    /// Returns the number of registered levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Reports whether no level is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a copy of every entry; mutating it does not touch the registry.
    #[must_use]
    pub fn handlers(&self) -> HandlerSnapshot {
        self.read()
            .iter()
            .map(|(name, level)| (name.clone(), level.clone()))
            .collect()
    }

    /// Returns every entry ordered by rank, ties broken by name.
    #[must_use]
    pub fn ordered(&self) -> Vec<SeverityLevel> {
        let mut levels: Vec<_> = self.read().values().cloned().collect();
        levels.sort_by_key(|level| (level.rank, level.name.clone()));
        levels
    }

    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<String, SeverityLevel>> {
        self.levels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<String, SeverityLevel>> {
        self.levels.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SeverityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ordered()).finish()
    }
}
