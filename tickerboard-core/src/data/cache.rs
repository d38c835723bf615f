//! In-memory query cache for fetched price tables.
//!
//! Keyed by the lookback window and a BLAKE3 digest of the registry contents,
//! so a changed registry never hits a table built for a different one.
//! Entries live for the life of the process; there is no eviction.

use std::collections::HashMap;
use std::sync::Arc;

use super::fetch::FetchedTable;
use super::registry::InstrumentRegistry;

/// Canonical cache key: `(days, registry digest)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    days: u32,
    registry_digest: [u8; 32],
}

impl CacheKey {
    pub fn new(days: u32, registry: &InstrumentRegistry) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(registry.len() as u64).to_le_bytes());
        for instrument in registry.iter() {
            // Length-prefix each field so ("ab","c") and ("a","bc") differ.
            for field in [&instrument.name, &instrument.symbol] {
                hasher.update(&(field.len() as u64).to_le_bytes());
                hasher.update(field.as_bytes());
            }
        }
        Self {
            days,
            registry_digest: *hasher.finalize().as_bytes(),
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

/// Process-scoped get-or-compute cache.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Arc<FetchedTable>>,
    hits: u64,
    misses: u64,
}

/// Cache counters, mostly for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<FetchedTable>> {
        self.entries.get(key).cloned()
    }

    /// Return the cached value for `key`, or compute, store and return it.
    ///
    /// The boolean is `true` on a hit. A failed computation stores nothing.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<FetchedTable, E>,
    ) -> Result<(Arc<FetchedTable>, bool), E> {
        if let Some(found) = self.entries.get(&key) {
            self.hits += 1;
            return Ok((Arc::clone(found), true));
        }

        let value = Arc::new(compute()?);
        self.misses += 1;
        self.entries.insert(key, Arc::clone(&value));
        Ok((value, false))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::PriceTable;

    fn empty() -> FetchedTable {
        FetchedTable {
            table: PriceTable::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn key_depends_on_days_and_registry() {
        let r = InstrumentRegistry::default_us();
        assert_eq!(CacheKey::new(20, &r), CacheKey::new(20, &r.clone()));
        assert_ne!(CacheKey::new(20, &r), CacheKey::new(21, &r));

        let other = InstrumentRegistry::from_pairs([("apple", "AAPL")]);
        assert_ne!(CacheKey::new(20, &r), CacheKey::new(20, &other));
    }

    #[test]
    fn key_is_unambiguous_across_field_boundaries() {
        let a = InstrumentRegistry::from_pairs([("ab", "c")]);
        let b = InstrumentRegistry::from_pairs([("a", "bc")]);
        assert_ne!(CacheKey::new(1, &a), CacheKey::new(1, &b));
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let mut cache = QueryCache::new();
        let key = CacheKey::new(5, &InstrumentRegistry::default_us());

        let (_, hit) = cache
            .get_or_try_insert_with(key, || Ok::<_, ()>(empty()))
            .unwrap();
        assert!(!hit);

        let (_, hit) = cache
            .get_or_try_insert_with(key, || -> Result<FetchedTable, ()> {
                panic!("must not recompute")
            })
            .unwrap();
        assert!(hit);

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn failed_compute_is_not_cached() {
        let mut cache = QueryCache::new();
        let key = CacheKey::new(5, &InstrumentRegistry::default_us());

        let result = cache.get_or_try_insert_with(key, || Err::<FetchedTable, _>("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.stats().entries, 0);
    }
}
