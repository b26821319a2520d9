//! ChainedHashMap: string-keyed table of `ChainList` buckets.
//!
//! Bucket placement uses a polynomial rolling hash reduced modulo the
//! current capacity after every UTF-16 code unit. A side vector records keys
//! in insertion order; enumeration and rehashing walk it instead of the
//! buckets.

use crate::chain_list::ChainList;
use crate::config::Config;
use crate::error::ConfigError;
use log::{debug, trace, warn};
use std::fmt;

const HASH_MULTIPLIER: u128 = 31;

/// Bucket index of `key` in a table of `capacity` buckets.
///
/// `h = (h * 31 + unit) % capacity` for each UTF-16 code unit of `key`; the
/// empty key maps to bucket 0. Panics if `capacity` is zero.
pub fn bucket_index(key: &str, capacity: usize) -> usize {
    let modulus = capacity as u128;
    let h = key
        .encode_utf16()
        .fold(0u128, |h, unit| (h * HASH_MULTIPLIER + unit as u128) % modulus);
    // Reduced modulo `capacity`, so it fits back into usize.
    h as usize
}

fn empty_buckets<V>(capacity: usize) -> Vec<ChainList<V>> {
    // One list per slot; `vec![ChainList::new(); n]` would need `Clone` and
    // must not alias a single list anyway.
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, ChainList::new);
    buckets
}

pub struct ChainedHashMap<V> {
    buckets: Vec<ChainList<V>>,
    capacity: usize,
    initial_capacity: usize,
    load_factor: f64,
    size: usize,
    keys_order: Vec<String>, // insertion order, no duplicates
}

/// Iterator over `(key, value)` pairs in insertion order.
pub struct Iter<'a, V> {
    keys: std::slice::Iter<'a, String>,
    map: &'a ChainedHashMap<V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        // Every ordered key resolves, so `find_map` only skips on a broken
        // invariant.
        let map = self.map;
        self.keys
            .by_ref()
            .find_map(move |k| map.get(k).map(|v| (k.as_str(), v)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.keys.len()))
    }
}

impl<V> ChainedHashMap<V> {
    /// 16 buckets, load factor 0.75.
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    pub fn with_capacity_and_load_factor(
        capacity: usize,
        load_factor: f64,
    ) -> Result<Self, ConfigError> {
        Self::with_config(
            Config::new()
                .with_capacity(capacity)
                .with_load_factor(load_factor),
        )
    }

    fn from_valid_config(config: Config) -> Self {
        Self {
            buckets: empty_buckets(config.capacity),
            capacity: config.capacity,
            initial_capacity: config.capacity,
            load_factor: config.load_factor,
            size: 0,
            keys_order: Vec::new(),
        }
    }

    /// Bucket index for `key` at the current capacity.
    pub fn hash(&self, key: &str) -> usize {
        bucket_index(key, self.capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Number of entries. Same as the length of `keys()`.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of buckets holding at least one entry.
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }

    /// Inserts or overwrites `key`. May double the capacity afterwards.
    pub fn set<K: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let idx = self.hash(&key);
        let existed = self.buckets[idx].append(key.clone(), value);
        if !existed {
            trace!("set: new key {:?} in bucket {}", key, idx);
            self.size += 1;
            self.keys_order.push(key);
        }

        // A single doubling can leave a low load factor still exceeded.
        while self.over_load_factor() && self.resize() {}
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.hash(key)].get_value(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.hash(key);
        self.buckets[idx].get_value_mut(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.buckets[self.hash(key)].contains(key)
    }

    /// Removes `key`; `false` if it was absent.
    pub fn remove(&mut self, key: &str) -> bool {
        let idx = self.hash(key);
        if !self.buckets[idx].remove(key) {
            return false;
        }
        trace!("remove: key {:?} from bucket {}", key, idx);
        self.size -= 1;
        // Linear in the number of keys.
        if let Some(pos) = self.keys_order.iter().position(|k| k == key) {
            self.keys_order.remove(pos);
        }
        true
    }

    /// Drops every entry and returns to the initial capacity.
    pub fn clear(&mut self) {
        debug!(
            "clear: dropping {} entries, capacity {} -> {}",
            self.size, self.capacity, self.initial_capacity
        );
        self.buckets = empty_buckets(self.initial_capacity);
        self.capacity = self.initial_capacity;
        self.size = 0;
        self.keys_order.clear();
    }

    pub fn keys(&self) -> &[String] {
        &self.keys_order
    }

    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    pub fn entries(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            keys: self.keys_order.iter(),
            map: self,
        }
    }

    fn over_load_factor(&self) -> bool {
        self.size as f64 / self.capacity as f64 >= self.load_factor
    }

    /// Doubles the bucket count and moves every entry to its new bucket.
    /// Returns `false` when the bucket count cannot double.
    fn resize(&mut self) -> bool {
        let old_capacity = self.capacity;
        let Some(new_capacity) = old_capacity.checked_mul(2) else {
            warn!(
                "resize: bucket count {} cannot double; staying at current capacity",
                old_capacity
            );
            return false;
        };

        let mut old_buckets = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for key in &self.keys_order {
            let (key, value) = old_buckets[bucket_index(key, old_capacity)]
                .take(key)
                .expect("ordered key must live in its bucket at the old capacity");
            let idx = bucket_index(&key, new_capacity);
            self.buckets[idx].append(key, value);
        }
        self.capacity = new_capacity;
        debug!(
            "resize: capacity {} -> {}, rehashed {} entries",
            old_capacity, new_capacity, self.size
        );
        true
    }
}

impl<V> Default for ChainedHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for ChainedHashMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a ChainedHashMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for ChainedHashMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ChainedHashMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::new();
        m.extend(iter);
        m
    }
}
