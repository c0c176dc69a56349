//! In-memory key/value store guarded by a reader/writer lock.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Capacity hint used when none is configured.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Outcome of [`Store::insert_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The value was stored.
    Inserted,
    /// The key already holds a non-empty value, which was left untouched.
    Occupied { existing: String },
}

impl Insertion {
    /// Whether the value was stored.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insertion::Inserted)
    }
}

/// Shared handle to the process-wide key/value map.
///
/// Cloning is cheap and every clone sees the same entries. All access goes
/// through one `RwLock`: lookups take the shared side, mutations the
/// exclusive side, so a lookup never observes a half-applied write.
#[derive(Debug, Clone)]
pub struct Store {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl Store {
    /// Create an empty store with the default capacity hint.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty store pre-sized for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::with_capacity(capacity))),
        }
    }

    /// Insert or overwrite the value for `key`.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.into(), value.into());
    }

    /// Current value for `key`, or `None` if it was never set.
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Whether `key` has an entry, including one holding an empty value.
    pub async fn exists(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    /// Store `value` under `key` unless the key already holds a non-empty value.
    ///
    /// The check and the write happen under a single write guard, so two
    /// concurrent calls for the same key can never both report `Inserted`
    /// while one of them overwrites the other. An entry holding the empty
    /// string counts as vacant and may be filled.
    pub async fn insert_if_absent(&self, key: impl Into<String>, value: impl Into<String>) -> Insertion {
        let key = key.into();
        let mut entries = self.entries.write().await;

        match entries.get(&key) {
            Some(existing) if !existing.is_empty() => Insertion::Occupied {
                existing: existing.clone(),
            },
            _ => {
                entries.insert(key, value.into());
                Insertion::Inserted
            }
        }
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store has no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Hold the exclusive lock until the guard is dropped.
    #[cfg(test)]
    pub(crate) async fn lock_exclusive(&self) -> tokio::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().await
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn get_before_set_is_absent() {
        let store = Store::new();
        assert_eq!(store.get("missing").await, None);
        assert!(!store.exists("missing").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = Store::new();
        store.set("a", "1").await;
        assert_eq!(store.get("a").await.as_deref(), Some("1"));

        store.set("a", "2").await;
        assert_eq!(store.get("a").await.as_deref(), Some("2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = Store::new();
        store.set("k1", "one").await;
        store.set("k2", "two").await;
        store.set("k2", "three").await;

        assert_eq!(store.get("k1").await.as_deref(), Some("one"));
        assert_eq!(store.get("k2").await.as_deref(), Some("three"));
    }

    #[tokio::test]
    async fn empty_value_is_still_present() {
        let store = Store::new();
        store.set("blank", "").await;

        assert_eq!(store.get("blank").await.as_deref(), Some(""));
        assert!(store.exists("blank").await);
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = Store::with_capacity(4);
        let other = store.clone();
        other.set("shared", "yes").await;
        assert_eq!(store.get("shared").await.as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_value() {
        let store = Store::new();
        assert_eq!(store.insert_if_absent("a", "1").await, Insertion::Inserted);
        assert_eq!(
            store.insert_if_absent("a", "2").await,
            Insertion::Occupied { existing: "1".into() }
        );
        assert_eq!(store.get("a").await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn insert_if_absent_fills_empty_value() {
        let store = Store::new();
        store.set("a", "").await;
        assert!(store.insert_if_absent("a", "filled").await.is_inserted());
        assert_eq!(store.get("a").await.as_deref(), Some("filled"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_have_single_winner() {
        let store = Store::new();
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert_if_absent("contended", format!("v{i}")).await
            }));
        }

        let mut winners = Vec::new();
        for (i, handle) in handles.into_iter().enumerate() {
            if handle.await.unwrap().is_inserted() {
                winners.push(format!("v{i}"));
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(store.get("contended").await, Some(winners.remove(0)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sets_on_distinct_keys_are_all_visible() {
        let store = Store::new();
        let handles: Vec<_> = (0..200)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.set(format!("key-{i}"), format!("value-{i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 200);
        for i in 0..200 {
            assert_eq!(store.get(&format!("key-{i}")).await, Some(format!("value-{i}")));
        }
    }

    #[tokio::test]
    async fn readers_do_not_block_each_other() {
        let store = Store::new();
        store.set("a", "1").await;

        let held = store.entries.read().await;
        let value = timeout(Duration::from_millis(100), store.get("a"))
            .await
            .expect("reader blocked by another reader");
        assert_eq!(value.as_deref(), Some("1"));
        drop(held);
    }

    #[tokio::test]
    async fn writer_waits_for_readers() {
        let store = Store::new();

        let held = store.entries.read().await;
        let blocked = timeout(Duration::from_millis(50), store.set("a", "1")).await;
        assert!(blocked.is_err(), "writer ran while a reader held the lock");
        drop(held);

        store.set("a", "1").await;
        assert_eq!(store.get("a").await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn readers_wait_for_writer() {
        let store = Store::new();
        store.set("a", "old").await;

        let mut guard = store.lock_exclusive().await;
        guard.insert("a".into(), "new".into());
        let blocked = timeout(Duration::from_millis(50), store.get("a")).await;
        assert!(blocked.is_err(), "reader ran during a write");
        drop(guard);

        assert_eq!(store.get("a").await.as_deref(), Some("new"));
    }
}
