//! Fast hash map and hash set type aliases.
//!
//! These use the Fx hash algorithm from `rustc-hash`, which is noticeably
//! faster than the standard library's SipHash for the short string and path
//! keys used throughout the workspace. Denial-of-service resistance is not
//! required for internal lookups.
//!
//! # Examples
//!
//! ```
//! use tm_core::{FxHashMap, FxHashSet};
//!
//! let mut seen: FxHashSet<&str> = FxHashSet::default();
//! assert!(seen.insert("Foo"));
//! assert!(!seen.insert("Foo"));
//!
//! let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
//! *counts.entry("Foo").or_default() += 1;
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;
