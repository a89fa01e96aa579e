//! Schema dictionary cache
//!
//! The compact protocol sends labels, property keys and relationship types as
//! indexes into server-side dictionaries. This module keeps a client-side copy
//! of those three dictionaries for one graph session.
//!
//! # Lifecycle
//!
//! Each dictionary is either [`DictionaryState::Empty`] or
//! [`DictionaryState::Populated`]. An empty dictionary is filled on first
//! access through a [`SchemaSource`] (in practice a `CALL db.labels()` style
//! procedure call on the same session). Once populated, lookups never go back
//! to the engine until [`MetadataCache::invalidate`] empties all three.
//!
//! # Stale indexes
//!
//! Another session may add property keys between our last fill and the
//! current reply. [`MetadataCache::resolve`] therefore allows one
//! invalidate-and-refetch per [`RefreshBudget`]; an index that is still out
//! of range afterwards is a [`GraphError::SchemaStale`].
//!
//! # Locking
//!
//! Check-then-fetch and invalidation run under one mutex, so two callers
//! never both fetch into an empty cache and an invalidation never lands in
//! the middle of a fill.

use crate::errors::{GraphError, GraphResult};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One of the three schema dictionaries kept by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dictionary {
    Labels,
    PropertyKeys,
    RelationshipTypes,
}

impl Dictionary {
    pub const ALL: [Dictionary; 3] = [
        Dictionary::Labels,
        Dictionary::PropertyKeys,
        Dictionary::RelationshipTypes,
    ];

    /// Procedure listing the dictionary's entries in index order
    pub fn procedure(self) -> &'static str {
        match self {
            Dictionary::Labels => "db.labels",
            Dictionary::PropertyKeys => "db.propertyKeys",
            Dictionary::RelationshipTypes => "db.relationshipTypes",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Dictionary::Labels => "labels",
            Dictionary::PropertyKeys => "propertyKeys",
            Dictionary::RelationshipTypes => "relationshipTypes",
        }
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where dictionary contents come from when the cache is empty
#[cfg_attr(test, mockall::automock)]
pub trait SchemaSource {
    /// Fetch the full dictionary, entries in index order
    fn fetch_dictionary(&self, dictionary: Dictionary) -> GraphResult<Vec<String>>;
}

/// Fixed dictionaries, for offline decoding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    pub labels: Vec<String>,
    pub property_keys: Vec<String>,
    pub relationship_types: Vec<String>,
}

impl StaticSchema {
    pub fn with_property_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticSchema {
            property_keys: keys.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

impl SchemaSource for StaticSchema {
    fn fetch_dictionary(&self, dictionary: Dictionary) -> GraphResult<Vec<String>> {
        Ok(match dictionary {
            Dictionary::Labels => self.labels.clone(),
            Dictionary::PropertyKeys => self.property_keys.clone(),
            Dictionary::RelationshipTypes => self.relationship_types.clone(),
        })
    }
}

/// Cache state of a single dictionary
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DictionaryState {
    #[default]
    Empty,
    /// Contents as of the last fetch
    Populated(Arc<Vec<String>>),
}

impl DictionaryState {
    pub fn is_populated(&self) -> bool {
        matches!(self, DictionaryState::Populated(_))
    }
}

#[derive(Debug, Default)]
struct CacheState {
    labels: DictionaryState,
    property_keys: DictionaryState,
    relationship_types: DictionaryState,
}

impl CacheState {
    fn slot(&mut self, dictionary: Dictionary) -> &mut DictionaryState {
        match dictionary {
            Dictionary::Labels => &mut self.labels,
            Dictionary::PropertyKeys => &mut self.property_keys,
            Dictionary::RelationshipTypes => &mut self.relationship_types,
        }
    }
}

/// Number of reactive refreshes a single decode may still perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshBudget {
    remaining: u8,
}

impl RefreshBudget {
    /// Budget for one decode call: exactly one refresh
    pub fn single() -> Self {
        RefreshBudget { remaining: 1 }
    }

    pub fn exhausted() -> Self {
        RefreshBudget { remaining: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    fn take(&mut self) -> bool {
        if self.remaining == 0 {
            false
        } else {
            self.remaining -= 1;
            true
        }
    }
}

impl Default for RefreshBudget {
    fn default() -> Self {
        Self::single()
    }
}

/// Per-session cache of the engine's schema dictionaries
#[derive(Debug, Default)]
pub struct MetadataCache {
    state: Mutex<CacheState>,
    hits: AtomicU64,
    fetches: AtomicU64,
    invalidations: AtomicU64,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached contents of `dictionary`, fetched from `source` if empty
    pub fn get(
        &self,
        dictionary: Dictionary,
        source: &dyn SchemaSource,
    ) -> GraphResult<Arc<Vec<String>>> {
        let mut state = self.lock();
        let slot = state.slot(dictionary);

        if let DictionaryState::Populated(entries) = slot {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(entries));
        }

        let entries = Arc::new(source.fetch_dictionary(dictionary)?);
        self.fetches.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "Fetched {} via {}(): {} entries",
            dictionary,
            dictionary.procedure(),
            entries.len()
        );
        *slot = DictionaryState::Populated(Arc::clone(&entries));
        Ok(entries)
    }

    pub fn labels(&self, source: &dyn SchemaSource) -> GraphResult<Arc<Vec<String>>> {
        self.get(Dictionary::Labels, source)
    }

    pub fn property_keys(&self, source: &dyn SchemaSource) -> GraphResult<Arc<Vec<String>>> {
        self.get(Dictionary::PropertyKeys, source)
    }

    pub fn relationship_types(&self, source: &dyn SchemaSource) -> GraphResult<Arc<Vec<String>>> {
        self.get(Dictionary::RelationshipTypes, source)
    }

    /// Empty all three dictionaries; the next access refetches
    pub fn invalidate(&self) {
        let mut state = self.lock();
        *state = CacheState::default();
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        log::info!("Schema dictionary cache invalidated");
    }

    /// Snapshot of one dictionary's state
    pub fn state(&self, dictionary: Dictionary) -> DictionaryState {
        self.lock().slot(dictionary).clone()
    }

    /// Resolve `index` in `dictionary` to its name.
    ///
    /// An index `>= len` triggers one invalidate-and-refetch if `budget`
    /// allows it; still out of range afterwards (or with no budget left) is
    /// `SchemaStale`.
    pub fn resolve(
        &self,
        dictionary: Dictionary,
        index: usize,
        source: &dyn SchemaSource,
        budget: &mut RefreshBudget,
    ) -> GraphResult<String> {
        let entries = self.get(dictionary, source)?;
        if index < entries.len() {
            return Ok(entries[index].clone());
        }

        if !budget.take() {
            return Err(GraphError::SchemaStale {
                dictionary,
                index,
                cached: entries.len(),
            });
        }

        log::warn!(
            "{} index {} beyond cached {} entries, refreshing schema",
            dictionary,
            index,
            entries.len()
        );
        self.invalidate();

        let entries = self.get(dictionary, source)?;
        if index >= entries.len() {
            return Err(GraphError::SchemaStale {
                dictionary,
                index,
                cached: entries.len(),
            });
        }
        Ok(entries[index].clone())
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

/// Cache counters for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub fetches: u64,
    pub invalidations: u64,
}

impl CacheMetrics {
    /// Fraction of accesses served without a fetch (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.fetches;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
