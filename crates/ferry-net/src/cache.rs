//! Session Page Cache
//!
//! Raw markup of visited pages, keyed by absolute URL without fragment.
//! Entries are kept in insertion order. Under the default policy nothing is
//! ever evicted or revalidated: the cache lives exactly as long as the page
//! session.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use url::Url;

/// How long cached markup may be reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Reuse for the whole session, never revalidate
    #[default]
    Session,
    /// Reuse while younger than the given age
    MaxAge(Duration),
    /// Never store anything
    Disabled,
}

/// Cached page
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw markup as fetched
    pub markup: String,
    /// Time when cached
    pub stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, policy: CachePolicy) -> bool {
        match policy {
            CachePolicy::Session => true,
            CachePolicy::MaxAge(max_age) => self.stored_at.elapsed() <= max_age,
            CachePolicy::Disabled => false,
        }
    }
}

/// Cache key for a URL: the absolute URL with its fragment stripped
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

/// Page cache
#[derive(Debug, Default)]
pub struct PageCache {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
    policy: CachePolicy,
}

impl PageCache {
    /// Create an empty cache with the given policy
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Get cached markup, dropping the entry if it has gone stale
    pub fn get(&mut self, key: &str) -> Option<String> {
        let fresh = self.entries.get(key)?.is_fresh(self.policy);
        if !fresh {
            tracing::debug!("Dropping stale page cache entry for {}", key);
            self.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.markup.clone())
    }

    /// Check if a fresh entry exists (without evicting)
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.policy))
    }

    /// Store markup. Re-storing a key keeps its original position.
    pub fn put(&mut self, key: &str, markup: String) {
        if self.policy == CachePolicy::Disabled {
            return;
        }

        let entry = CacheEntry {
            markup,
            stored_at: Instant::now(),
        };
        if self.entries.insert(key.to_string(), entry).is_none() {
            self.order.push(key.to_string());
        }
    }

    /// Remove an entry
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(entry)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
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

    #[test]
    fn test_cache_basic() {
        let mut cache = PageCache::new(CachePolicy::Session);
        cache.put("https://example.com/about", "<p>Hello</p>".into());

        assert!(cache.contains("https://example.com/about"));
        assert_eq!(cache.get("https://example.com/about").as_deref(), Some("<p>Hello</p>"));
        assert!(cache.get("https://example.com/other").is_none());
    }

    #[test]
    fn test_insertion_order_kept_on_overwrite() {
        let mut cache = PageCache::default();
        cache.put("b", "1".into());
        cache.put("a", "2".into());
        cache.put("b", "3".into());

        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(cache.get("b").as_deref(), Some("3"));
    }

    #[test]
    fn test_disabled_policy_stores_nothing() {
        let mut cache = PageCache::new(CachePolicy::Disabled);
        cache.put("url", "data".into());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_max_age_expiry() {
        let mut cache = PageCache::new(CachePolicy::MaxAge(Duration::ZERO));
        cache.put("url", "data".into());
        std::thread::sleep(Duration::from_millis(2));

        assert!(!cache.contains("url"));
        assert!(cache.get("url").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.keys().count(), 0);
    }

    #[test]
    fn test_cache_key_strips_fragment() {
        let url = Url::parse("https://example.com/docs?page=2#intro").unwrap();
        assert_eq!(cache_key(&url), "https://example.com/docs?page=2");
    }
}
