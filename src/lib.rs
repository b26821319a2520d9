//! chained-hashmap: a string-keyed hash map that resolves collisions by
//! separate chaining over singly linked lists.
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - ChainList<V>: one bucket. A singly linked list of `(String, V)`
//!     nodes, unique by key, new keys linked at the tail.
//!   - ChainedHashMap<V>: a vector of `capacity` independent ChainLists
//!     plus a side vector of keys in insertion order. Routes every
//!     operation to `bucket_index(key, capacity)` and grows when the
//!     load factor is reached.
//!
//! Hashing
//! - `h = (h * 31 + unit) % capacity` over the key's UTF-16 code units,
//!   reducing after every unit. Placement therefore depends on the current
//!   capacity and every key moves on resize.
//!
//! Growth and rehashing
//! - After each `set`, while `len / capacity >= load_factor` the bucket
//!   vector doubles. Rehashing walks the insertion-order keys, takes each
//!   entry out of its old bucket and appends it to its new one; nothing is
//!   observable mid-way because the whole step runs under `&mut self`.
//! - `clear()` resets buckets, length, key order and capacity together.
//!
//! Constraints
//! - Single-threaded use; mutation needs `&mut self`, so sharing across
//!   threads requires a caller-held lock.
//! - Keys are `String`s, so there is no runtime key-type check.
//! - Lookup misses are `None`/`false`; the only error type is
//!   `ConfigError`, returned when construction parameters are invalid.
//! - Removing a key scans the key-order vector (O(len)).

pub mod chain_list;
mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod error;

// Public surface
pub use chained_hash_map::{bucket_index, ChainedHashMap, Iter};
pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::ConfigError;
