/*!
 * Keyed cache of expensive process-wide resources.
 *
 * Each value is built on first use of its key while the cache lock is held,
 * so concurrent callers never build the same resource twice. Values live
 * until the cache is dropped or cleared. The cache is passed around
 * explicitly (usually as `Arc<ResourceCache<..>>`), so tests can hand a
 * component a pre-filled or empty cache of their own.
 */

use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Lazily filled map from key to shared resource
#[derive(Debug)]
pub struct ResourceCache<K, V> {
    entries: Mutex<HashMap<K, Arc<V>>>,
}

impl<K, V> Default for ResourceCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> ResourceCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, building it with `init` on first use.
    ///
    /// A failed build caches nothing; the next call tries again.
    pub fn get_or_try_init<E, F>(&self, key: &K, init: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let mut entries = self.entries.lock();
        if let Some(value) = entries.get(key) {
            return Ok(value.clone());
        }

        debug!("Creating cached resource for {:?}", key);
        let value = Arc::new(init()?);
        entries.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Cached value, if any
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.lock().get(key).cloned()
    }

    /// Put a value in place, replacing any previous one
    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.lock().insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every cached value
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
