//! Striped lock table for per-application serialization.
//!
//! A fixed array of mutexes keyed by `hash(key) % stripes`. Two calls
//! with the same key always serialize; keys hashing to the same stripe
//! also serialize, which is acceptable false sharing at the default
//! width of 32.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::{Mutex, MutexGuard};

/// Fixed-width table of mutexes providing per-key mutual exclusion
/// without per-key allocation.
pub struct StripedLock {
    stripes: Vec<Mutex<()>>,
}

impl StripedLock {
    /// Creates a lock table with the given number of stripes.
    ///
    /// A width of zero is corrected to a single stripe.
    #[must_use]
    pub fn new(stripes: usize) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Acquires the stripe for `key`, blocking until it is free.
    ///
    /// The guard releases at the end of the caller's scope.
    pub fn lock(&self, key: &str) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_index(key)].lock()
    }

    /// Number of stripes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stripes.len()
    }

    /// Whether the table has no stripes. Always false by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stripes.is_empty()
    }

    fn stripe_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.stripes.len()
    }
}
