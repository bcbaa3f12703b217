//! In-process collection cache for list endpoints.
//!
//! Entries are keyed by admin section plus a fingerprint of the list
//! filters. Invalidation is coarse: any successful mutation drops every
//! entry for its section, it never patches cached payloads in place.
//! Each invalidation is also published through an [`Observable`] so other
//! parts of the process can react (the epoch makes consecutive
//! invalidations of the same section distinct values).

use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    navigation::AdminSection,
    observable::{Observable, Subscription},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    section: AdminSection,
    fingerprint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationEvent {
    pub section: AdminSection,
    pub epoch: u64,
}

pub struct CollectionCache {
    entries: DashMap<CacheKey, Value>,
    events: Observable<Option<InvalidationEvent>>,
    epoch: std::sync::atomic::AtomicU64,
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionCache {
    pub fn new() -> Self {
        CollectionCache {
            entries: DashMap::new(),
            events: Observable::new(None),
            epoch: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Fingerprint list filters into a stable cache key component.
    pub fn fingerprint(parts: &[(&str, Option<&str>)]) -> String {
        parts
            .iter()
            .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn get(&self, section: AdminSection, fingerprint: &str) -> Option<Value> {
        let key = CacheKey {
            section,
            fingerprint: fingerprint.to_string(),
        };
        self.entries.get(&key).map(|entry| entry.clone())
    }

    pub fn insert<T: Serialize>(&self, section: AdminSection, fingerprint: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            let key = CacheKey {
                section,
                fingerprint: fingerprint.to_string(),
            };
            self.entries.insert(key, json);
        }
    }

    /// Drop every cached collection for a section and publish the event.
    pub fn invalidate_section(&self, section: AdminSection) {
        self.entries.retain(|key, _| key.section != section);

        let epoch = self
            .epoch
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;
        self.events.set(Some(InvalidationEvent { section, epoch }));
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription<Option<InvalidationEvent>>
    where
        F: Fn(&Option<InvalidationEvent>) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn invalidation_is_scoped_to_the_section() {
        let cache = CollectionCache::new();
        cache.insert(AdminSection::Blog, "page=1", &vec!["a"]);
        cache.insert(AdminSection::Blog, "page=2", &vec!["b"]);
        cache.insert(AdminSection::Projects, "page=1", &vec!["c"]);

        cache.invalidate_section(AdminSection::Blog);

        assert!(cache.get(AdminSection::Blog, "page=1").is_none());
        assert!(cache.get(AdminSection::Blog, "page=2").is_none());
        assert!(cache.get(AdminSection::Projects, "page=1").is_some());
    }

    #[test]
    fn repeated_invalidations_all_notify() {
        let cache = CollectionCache::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_by_listener = seen.clone();
        let _sub = cache.subscribe(move |_| {
            seen_by_listener.fetch_add(1, Ordering::SeqCst);
        });

        cache.invalidate_section(AdminSection::Blog);
        cache.invalidate_section(AdminSection::Blog);

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fingerprint_skips_absent_filters() {
        let fp = CollectionCache::fingerprint(&[
            ("page", Some("1")),
            ("q", None),
            ("status", Some("draft")),
        ]);
        assert_eq!(fp, "page=1&status=draft");
    }
}
