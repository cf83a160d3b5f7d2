/*!
Support for hash-consing.

Value-like objects --- symbols, expressions, literals, clauses, and friends --- are *interned*: a weak, key-indexed table returns the existing instance for a canonical key, or the caller creates a fresh instance and registers it.
As a consequence:

- Equality of interned objects is identity, checked through a construction-order serial.
- Hashing is the (precomputed) serial.
- The serial doubles as the final tie-breaker of the total order interned objects are arranged in.

Tables are thread local and live in the module of the type they serve; this module provides the serial counter and the table structure.

Entries are weak, and purged in bulk once enough dead entries could have accumulated.
Note, an expression and its negation hold strong references to each other, so expression entries persist for the life of the thread regardless.
*/

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::{Rc, Weak};

thread_local! {
    static SERIAL: Cell<u64> = const { Cell::new(0) };
}

/// The next construction-order serial.
/// Serials are unique within a thread and increase monotonically.
pub fn next_serial() -> u64 {
    SERIAL.with(|counter| {
        let serial = counter.get();
        counter.set(serial + 1);
        serial
    })
}

/// A weak table from canonical keys to interned instances.
pub struct WeakTable<K, T> {
    entries: HashMap<K, Weak<T>>,

    /// Purge dead entries when the table grows past this size.
    purge_limit: usize,
}

impl<K: Eq + Hash, T> Default for WeakTable<K, T> {
    fn default() -> Self {
        WeakTable {
            entries: HashMap::default(),
            purge_limit: 64,
        }
    }
}

impl<K: Eq + Hash, T> WeakTable<K, T> {
    /// The interned instance at `key`, if it is still alive.
    pub fn get(&self, key: &K) -> Option<Rc<T>> {
        self.entries.get(key).and_then(Weak::upgrade)
    }

    /// Registers `instance` at `key`, occasionally sweeping dead entries.
    pub fn insert(&mut self, key: K, instance: &Rc<T>) {
        if self.entries.len() >= self.purge_limit {
            self.entries.retain(|_, v| v.strong_count() > 0);
            self.purge_limit = (self.entries.len() * 2).max(64);
        }
        self.entries.insert(key, Rc::downgrade(instance));
    }
}
