//! In-process [`KeyValueStore`] with Redis-like semantics.
//!
//! Keys are kept sorted. A scan cursor is an opaque token standing for the
//! last key examined, so writes and deletes between pages never make a scan
//! skip a key that exists throughout it. `count` bounds the number of keys
//! examined per page (not the number returned), as with Redis `SCAN`.
//! Expired keys are dropped lazily.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use craftbook_core::cleanup::Lifetime;
use tokio::sync::RwLock;

use crate::store::{KeyValueStore, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &str, ttl: Option<u64>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: ttl.map(|secs| Instant::now() + Duration::from_secs(secs)),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Entry>>,
    /// Open scan cursors: token -> last key examined.
    cursors: Mutex<HashMap<u64, String>>,
    next_cursor: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_cursor(&self, cursor: u64) -> Option<String> {
        self.cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&cursor)
    }

    fn open_cursor(&self, last_key: String) -> u64 {
        // Zero ends a scan, so tokens start at one.
        let token = self.next_cursor.fetch_add(1, Ordering::Relaxed) + 1;
        self.cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, last_key);
        token
    }

    /// Number of live keys.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<u64>,
    ) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_live(now)) {
            return Ok(false);
        }
        entries.insert(key.to_string(), Entry::new(value, ttl));
        Ok(true)
    }

    async fn replace(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get_mut(key) {
            Some(entry) if entry.is_live(now) => {
                entry.value = value.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>), StoreError> {
        let start = if cursor == 0 {
            Bound::Unbounded
        } else {
            match self.take_cursor(cursor) {
                Some(last) => Bound::Excluded(last),
                // Unknown or already used cursor: nothing left to return.
                None => return Ok((0, Vec::new())),
            }
        };

        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut page = entries.range::<String, _>((start, Bound::Unbounded));

        let mut keys = Vec::new();
        let mut last_examined = None;
        for (key, entry) in page.by_ref().take(count.max(1)) {
            if entry.is_live(now) && glob_match(pattern, key) {
                keys.push(key.clone());
            }
            last_examined = Some(key.clone());
        }

        let next = match last_examined {
            Some(last) if page.next().is_some() => self.open_cursor(last),
            _ => 0,
        };
        Ok((next, keys))
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|e| e.is_live(now)))
    }

    async fn ttl(&self, key: &str) -> Result<Lifetime, StoreError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let lifetime = match entries.get(key) {
            Some(entry) if entry.is_live(now) => match entry.expires_at {
                None => Lifetime::Permanent,
                Some(at) => {
                    let left = at - now;
                    let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
                    Lifetime::Remaining(secs.max(1))
                }
            },
            _ => Lifetime::Expired,
        };
        Ok(lifetime)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Match `key` against a Redis-style glob supporting `*` and `?`.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let k: Vec<char> = key.chars().collect();
    let (mut pi, mut ki) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while ki < k.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == k[ki]) {
            pi += 1;
            ki += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ki));
            pi += 1;
        } else if let Some((sp, sk)) = star {
            pi = sp + 1;
            ki = sk + 1;
            star = Some((sp, sk + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matching() {
        assert!(glob_match("character:*", "character:abc"));
        assert!(glob_match("*", "anything"));
        assert!(glob_match("community:crafts*", "community:crafts"));
        assert!(glob_match("community:crafts*", "community:crafts:alliance"));
        assert!(glob_match("xref:?tem:*", "xref:item:1"));
        assert!(!glob_match("character:*", "community:crafts"));
        assert!(!glob_match("a*b", "acbd"));
    }

    #[tokio::test]
    async fn ttl_reports_lifetimes() {
        let store = MemoryStore::new();
        store.set("p", "1", None).await.unwrap();
        store.set("t", "1", Some(3600)).await.unwrap();

        assert_eq!(store.ttl("p").await.unwrap(), Lifetime::Permanent);
        assert!(matches!(store.ttl("t").await.unwrap(), Lifetime::Remaining(s) if s > 3590));
        assert_eq!(store.ttl("missing").await.unwrap(), Lifetime::Expired);
    }

    #[tokio::test]
    async fn zero_ttl_entry_is_gone() {
        let store = MemoryStore::new();
        store.set("k", "v", Some(0)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert_eq!(store.ttl("k").await.unwrap(), Lifetime::Expired);
    }

    #[tokio::test]
    async fn replace_keeps_ttl_and_requires_existing_key() {
        let store = MemoryStore::new();
        assert!(!store.replace("k", "v").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v", Some(100)).await.unwrap();
        assert!(store.replace("k", "w").await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("w"));
        assert!(matches!(store.ttl("k").await.unwrap(), Lifetime::Remaining(_)));
    }

    #[tokio::test]
    async fn set_if_absent_respects_existing_keys() {
        let store = MemoryStore::new();
        assert!(store.set_if_absent("k", "a", None).await.unwrap());
        assert!(!store.set_if_absent("k", "b", None).await.unwrap());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn scan_pages_by_examined_keys() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.set(&format!("character:{i}"), "{}", None).await.unwrap();
        }
        store.set("community:crafts", "[]", None).await.unwrap();

        let (next, page) = store.scan(0, "character:*", 3).await.unwrap();
        assert_ne!(next, 0);
        assert_eq!(page.len(), 3);

        let (next, page) = store.scan(next, "character:*", 3).await.unwrap();
        assert_eq!(next, 0);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn delete_between_pages_does_not_skip_keys() {
        let store = MemoryStore::new();
        for i in 0..6 {
            store.set(&format!("character:{i}"), "{}", None).await.unwrap();
        }

        let (next, first) = store.scan(0, "character:*", 3).await.unwrap();
        assert_eq!(first, vec!["character:0", "character:1", "character:2"]);
        store.del("character:1").await.unwrap();

        let (next, second) = store.scan(next, "character:*", 3).await.unwrap();
        assert_eq!(next, 0);
        assert_eq!(second, vec!["character:3", "character:4", "character:5"]);
    }

    #[tokio::test]
    async fn used_cursor_ends_the_scan() {
        let store = MemoryStore::new();
        for i in 0..4 {
            store.set(&format!("k{i}"), "v", None).await.unwrap();
        }
        let (next, _) = store.scan(0, "*", 2).await.unwrap();
        store.scan(next, "*", 2).await.unwrap();
        assert_eq!(store.scan(next, "*", 2).await.unwrap(), (0, Vec::new()));
    }

    #[tokio::test]
    async fn del_reports_removal() {
        let store = MemoryStore::new();
        store.set("k", "v", None).await.unwrap();
        assert!(store.del("k").await.unwrap());
        assert!(!store.del("k").await.unwrap());
        assert!(store.is_empty().await);
    }
}
