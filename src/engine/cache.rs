//! Per-view cache of fetched issues.
//!
//! One slot per tab (standard views plus the activity slot when enabled).
//! A slot is replaced wholesale on a successful fetch and left untouched on
//! failure, so readers always see either the previous complete snapshot or
//! the new one. Stale data is preferred over no data.

use std::time::{Duration, Instant};

use crate::model::Issue;

/// How long a successful fetch satisfies non-forced lookups. Deliberately
/// independent of the 60s global refresh cadence.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub issues: Vec<Issue>,
    pub fetched_at: Instant,
}

#[derive(Debug, Default)]
pub struct ViewCache {
    entries: Vec<Option<CacheEntry>>,
}

impl ViewCache {
    pub fn new(slots: usize) -> Self {
        ViewCache {
            entries: vec![None; slots],
        }
    }

    /// Empty every slot and resize to the new slot count (settings re-arm).
    pub fn reset(&mut self, slots: usize) {
        self.entries.clear();
        self.entries.resize(slots, None);
    }

    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether a fetch is required for this slot. A non-forced lookup
    /// within the freshness window is satisfied from cache with zero
    /// remote calls; a forced lookup always fetches.
    pub fn needs_fetch(&self, slot: usize, force: bool, now: Instant) -> bool {
        if force {
            return true;
        }
        match self.entries.get(slot).and_then(|e| e.as_ref()) {
            Some(entry) => now.duration_since(entry.fetched_at) >= FRESHNESS_WINDOW,
            None => true,
        }
    }

    /// Atomically replace a slot after a successful fetch.
    pub fn replace(&mut self, slot: usize, issues: Vec<Issue>, now: Instant) {
        if slot < self.entries.len() {
            self.entries[slot] = Some(CacheEntry {
                issues,
                fetched_at: now,
            });
        }
    }

    pub fn entry(&self, slot: usize) -> Option<&CacheEntry> {
        self.entries.get(slot).and_then(|e| e.as_ref())
    }

    pub fn issues(&self, slot: usize) -> &[Issue] {
        self.entry(slot).map_or(&[], |e| e.issues.as_slice())
    }

    pub fn fetched_at(&self, slot: usize) -> Option<Instant> {
        self.entry(slot).map(|e| e.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_needs_fetch() {
        let cache = ViewCache::new(2);
        let now = Instant::now();
        assert!(cache.needs_fetch(0, false, now));
    }

    #[test]
    fn fresh_entry_skips_fetch_within_window() {
        let mut cache = ViewCache::new(1);
        let t0 = Instant::now();
        cache.replace(0, Vec::new(), t0);
        assert!(!cache.needs_fetch(0, false, t0 + Duration::from_secs(29)));
        assert!(cache.needs_fetch(0, false, t0 + FRESHNESS_WINDOW));
    }

    #[test]
    fn forced_lookup_always_fetches() {
        let mut cache = ViewCache::new(1);
        let t0 = Instant::now();
        cache.replace(0, Vec::new(), t0);
        assert!(cache.needs_fetch(0, true, t0));
    }

    #[test]
    fn reset_empties_and_resizes() {
        let mut cache = ViewCache::new(1);
        let t0 = Instant::now();
        cache.replace(0, Vec::new(), t0);
        cache.reset(3);
        assert_eq!(cache.slot_count(), 3);
        assert!(cache.entry(0).is_none());
    }

    #[test]
    fn replace_out_of_range_is_ignored() {
        let mut cache = ViewCache::new(1);
        cache.replace(5, Vec::new(), Instant::now());
        assert!(cache.entry(5).is_none());
    }
}
