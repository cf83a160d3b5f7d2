//! A transactional map.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::{normalize_chunks, Memory, Serial};

/// One transaction's view of the map.
///
/// `unique` holds keys freshly introduced here, `overriding` keys which already existed below, and `removed` keys deleted here.
/// `unique` and `removed` are always disjoint.
struct MapChunk<K, V> {
    removed: HashSet<K>,
    unique: HashMap<K, V>,
    overriding: HashMap<K, V>,
}

impl<K, V> Default for MapChunk<K, V> {
    fn default() -> Self {
        MapChunk {
            removed: HashSet::default(),
            unique: HashMap::default(),
            overriding: HashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> MapChunk<K, V> {
    /// Absorbs the chunk of a committed child transaction.
    ///
    /// Unique keys of the child are promoted, overriding keys are applied to whichever part holds the key, and removals delete unique keys outright while recording the removal otherwise.
    /// A key removed below and introduced above collapses to `overriding`.
    fn absorb(&mut self, committed: MapChunk<K, V>) {
        for key in committed.removed {
            if self.unique.remove(&key).is_none() {
                self.overriding.remove(&key);
                self.removed.insert(key);
            }
        }
        for (key, value) in committed.unique {
            if self.removed.remove(&key) {
                self.overriding.insert(key, value);
            } else {
                self.unique.insert(key, value);
            }
        }
        for (key, value) in committed.overriding {
            if self.unique.contains_key(&key) {
                self.unique.insert(key, value);
            } else {
                self.overriding.insert(key, value);
            }
        }
    }
}

/// A map over an arena.
///
/// A read walks top-down, stopping at a removal or at the first `unique`/`overriding` hit.
/// An insert of an already-existing key targets `overriding`; an insert of a new key targets `unique`.
pub struct TxMap<K, V> {
    chunks: RefCell<Vec<(Serial, MapChunk<K, V>)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TxMap<K, V> {
    /// A fresh, empty map.
    pub fn new(_memory: &Memory) -> Self {
        TxMap {
            chunks: RefCell::default(),
        }
    }

    /// Binds `key` to `value` in the top transaction's overlay.
    pub fn insert(&self, memory: &Memory, key: K, value: V) {
        let exists_below = {
            let mut chunks = self.chunks.borrow_mut();
            normalize_chunks(memory, &mut chunks, MapChunk::absorb);
            let top = memory.top();
            if let Some((serial, chunk)) = chunks.last_mut() {
                if *serial == top {
                    chunk.removed.remove(&key);
                }
            }
            Self::lookup(&chunks, &key).is_some()
        };
        let mut chunks = self.chunks.borrow_mut();
        let top = Self::top_chunk(memory, &mut chunks);
        if exists_below && !top.unique.contains_key(&key) {
            top.overriding.insert(key, value);
        } else {
            top.unique.insert(key, value);
        }
    }

    /// Deletes `key` through the top transaction's overlay.
    /// Returns false if the key was not present.
    pub fn remove(&self, memory: &Memory, key: &K) -> bool {
        let removed_unique = {
            let mut chunks = self.chunks.borrow_mut();
            normalize_chunks(memory, &mut chunks, MapChunk::absorb);
            let top = memory.top();
            match chunks.last_mut() {
                Some((serial, chunk)) if *serial == top => chunk.unique.remove(key).is_some(),
                _ => false,
            }
        };
        if removed_unique {
            return true;
        }
        if self.get(memory, key).is_none() {
            return false;
        }
        let mut chunks = self.chunks.borrow_mut();
        let top = Self::top_chunk(memory, &mut chunks);
        top.overriding.remove(key);
        top.removed.insert(key.clone());
        true
    }

    /// The value bound to `key`, if any.
    pub fn get(&self, memory: &Memory, key: &K) -> Option<V> {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, MapChunk::absorb);
        Self::lookup(&chunks, key)
    }

    /// True if `key` is bound.
    pub fn contains(&self, memory: &Memory, key: &K) -> bool {
        self.get(memory, key).is_some()
    }

    /// True if `key` is bound by the *top* transaction's overlay.
    pub fn top_contains(&self, memory: &Memory, key: &K) -> bool {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, MapChunk::absorb);
        let top = memory.top();
        match chunks.last() {
            Some((serial, chunk)) if *serial == top => {
                chunk.unique.contains_key(key) || chunk.overriding.contains_key(key)
            }
            _ => false,
        }
    }

    /// The count of keys in the map.
    pub fn len(&self, memory: &Memory) -> usize {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, MapChunk::absorb);
        let count: isize = chunks
            .iter()
            .map(|(_, chunk)| chunk.unique.len() as isize - chunk.removed.len() as isize)
            .sum();
        count as usize
    }

    /// True if the map is empty.
    pub fn is_empty(&self, memory: &Memory) -> bool {
        self.len(memory) == 0
    }

    /// The keys of the map, in no particular order.
    pub fn keys(&self, memory: &Memory) -> Vec<K> {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, MapChunk::absorb);
        let mut removed: HashSet<K> = HashSet::default();
        let mut keys = Vec::new();
        for (_, chunk) in chunks.iter().rev() {
            for key in chunk.unique.keys() {
                if !removed.contains(key) {
                    keys.push(key.clone());
                }
            }
            removed.extend(chunk.removed.iter().cloned());
        }
        keys
    }

    /// The top-down walk over normalized chunks.
    fn lookup(chunks: &[(Serial, MapChunk<K, V>)], key: &K) -> Option<V> {
        for (_, chunk) in chunks.iter().rev() {
            if chunk.removed.contains(key) {
                return None;
            }
            if let Some(value) = chunk.unique.get(key) {
                return Some(value.clone());
            }
            if let Some(value) = chunk.overriding.get(key) {
                return Some(value.clone());
            }
        }
        None
    }

    /// The top transaction's chunk, created on demand.
    fn top_chunk<'c>(
        memory: &Memory,
        chunks: &'c mut Vec<(Serial, MapChunk<K, V>)>,
    ) -> &'c mut MapChunk<K, V> {
        let top = memory.top();
        match chunks.last() {
            Some((serial, _)) if *serial == top => {}
            _ => chunks.push((top, MapChunk::default())),
        }
        &mut chunks.last_mut().expect("! Chunk just ensured").1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_keys<V: Clone>(map: &TxMap<&'static str, V>, memory: &Memory) -> Vec<&'static str> {
        let mut keys = map.keys(memory);
        keys.sort();
        keys
    }

    #[test]
    fn basic_operations() {
        let memory = Memory::new();
        let m: TxMap<u32, &str> = TxMap::new(&memory);
        assert_eq!(m.len(&memory), 0);

        m.insert(&memory, 1, "d");
        m.insert(&memory, 2, "b");
        m.insert(&memory, 3, "c");
        m.insert(&memory, 1, "a");
        assert_eq!(m.len(&memory), 3);
        assert!(m.contains(&memory, &1));
        assert!(m.contains(&memory, &2));
        assert!(m.contains(&memory, &3));
        assert!(!m.contains(&memory, &4));
        assert_eq!(m.get(&memory, &1), Some("a"));
        assert_eq!(m.get(&memory, &2), Some("b"));
        assert_eq!(m.get(&memory, &3), Some("c"));
        assert_eq!(m.get(&memory, &5), None);
    }

    #[test]
    fn remove_without_transactions() {
        let memory = Memory::new();
        let m: TxMap<u32, &str> = TxMap::new(&memory);

        m.insert(&memory, 1, "a");
        m.insert(&memory, 2, "b");
        m.insert(&memory, 3, "c");
        assert!(m.remove(&memory, &2));
        assert_eq!(m.len(&memory), 2);
        assert!(m.contains(&memory, &1));
        assert!(!m.contains(&memory, &2));
        assert!(m.contains(&memory, &3));
        assert!(!m.remove(&memory, &2));
    }

    #[test]
    fn operations_across_transactions() {
        let memory = Memory::new();
        let m: TxMap<u32, &str> = TxMap::new(&memory);
        m.insert(&memory, 1, "d");
        memory.begin_transaction();
        m.insert(&memory, 2, "b");
        memory.begin_transaction();
        memory.begin_transaction();
        m.insert(&memory, 3, "c");
        memory.begin_transaction();
        m.insert(&memory, 1, "a");
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &1), Some("a"));
        assert_eq!(m.get(&memory, &2), Some("b"));
        assert_eq!(m.get(&memory, &3), Some("c"));
        assert_eq!(m.get(&memory, &5), None);
    }

    #[test]
    fn remove_then_insert_across_transactions() {
        let memory = Memory::new();
        let m: TxMap<u32, &str> = TxMap::new(&memory);

        m.insert(&memory, 1, "a");
        memory.begin_transaction();
        m.insert(&memory, 2, "b");
        memory.begin_transaction();
        m.insert(&memory, 3, "c");
        memory.begin_transaction();
        assert!(m.remove(&memory, &2));
        assert_eq!(m.len(&memory), 2);
        assert!(!m.contains(&memory, &2));

        m.insert(&memory, 2, "d");
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &2), Some("d"));
    }

    #[test]
    fn commit_preserves_the_visible_state() {
        let memory = Memory::new();
        let m: TxMap<&str, u32> = TxMap::new(&memory);
        m.insert(&memory, "apple", 10);
        m.insert(&memory, "tomato", 20);
        let t1 = memory.begin_transaction();
        m.insert(&memory, "apple", 30);
        m.insert(&memory, "potato", 40);
        let t2 = memory.begin_transaction();
        m.insert(&memory, "tomato", 50);
        m.insert(&memory, "potato", 60);
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"apple"), Some(30));
        assert_eq!(m.get(&memory, &"tomato"), Some(50));
        assert_eq!(m.get(&memory, &"potato"), Some(60));
        memory.commit(t1);
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"apple"), Some(30));
        assert_eq!(m.get(&memory, &"tomato"), Some(50));
        assert_eq!(m.get(&memory, &"potato"), Some(60));
        memory.commit(t2);
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"apple"), Some(30));
        assert_eq!(m.get(&memory, &"tomato"), Some(50));
        assert_eq!(m.get(&memory, &"potato"), Some(60));
        assert_eq!(sorted_keys(&m, &memory), vec!["apple", "potato", "tomato"]);
    }

    #[test]
    fn remove_and_commit() {
        let memory = Memory::new();
        let m: TxMap<&str, u32> = TxMap::new(&memory);

        m.insert(&memory, "a", 10);
        m.insert(&memory, "b", 2);
        m.insert(&memory, "c", 30);
        let t1 = memory.begin_transaction();
        m.insert(&memory, "b", 20);
        m.insert(&memory, "d", 40);
        assert!(m.remove(&memory, &"a"));
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"b"), Some(20));

        memory.commit(t1);
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"b"), Some(20));
        assert_eq!(m.get(&memory, &"c"), Some(30));
        assert_eq!(m.get(&memory, &"d"), Some(40));
        assert_eq!(sorted_keys(&m, &memory), vec!["b", "c", "d"]);
    }

    #[test]
    fn remove_then_insert_and_commit() {
        let memory = Memory::new();
        let m: TxMap<&str, u32> = TxMap::new(&memory);

        m.insert(&memory, "a", 1);
        memory.begin_transaction();
        m.insert(&memory, "b", 20);
        assert!(m.remove(&memory, &"a"));
        let t1 = memory.begin_transaction();
        m.insert(&memory, "a", 10);
        assert_eq!(m.len(&memory), 2);
        assert_eq!(m.get(&memory, &"a"), Some(10));
        assert_eq!(m.get(&memory, &"b"), Some(20));

        memory.commit(t1);
        assert_eq!(m.len(&memory), 2);
        assert_eq!(m.get(&memory, &"a"), Some(10));
        assert_eq!(m.get(&memory, &"b"), Some(20));
        assert_eq!(sorted_keys(&m, &memory), vec!["a", "b"]);
    }

    #[test]
    fn rollback_restores_lower_overlays() {
        let memory = Memory::new();
        let m: TxMap<&str, u32> = TxMap::new(&memory);
        m.insert(&memory, "apple", 10);
        m.insert(&memory, "tomato", 20);
        let t1 = memory.begin_transaction();
        m.insert(&memory, "apple", 30);
        m.insert(&memory, "potato", 40);
        let t2 = memory.begin_transaction();
        m.insert(&memory, "tomato", 50);
        m.insert(&memory, "potato", 60);
        memory.rollback(t2);
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"apple"), Some(30));
        assert_eq!(m.get(&memory, &"tomato"), Some(20));
        assert_eq!(m.get(&memory, &"potato"), Some(40));
        memory.rollback(t1);
        assert_eq!(m.len(&memory), 2);
        assert_eq!(m.get(&memory, &"apple"), Some(10));
        assert_eq!(m.get(&memory, &"tomato"), Some(20));
        assert_eq!(sorted_keys(&m, &memory), vec!["apple", "tomato"]);
    }

    #[test]
    fn remove_and_rollback() {
        let memory = Memory::new();
        let m: TxMap<&str, u32> = TxMap::new(&memory);

        m.insert(&memory, "a", 1);
        m.insert(&memory, "b", 20);
        memory.begin_transaction();
        m.insert(&memory, "c", 30);
        assert!(m.remove(&memory, &"a"));
        let t1 = memory.begin_transaction();
        m.insert(&memory, "a", 10);
        assert_eq!(m.len(&memory), 3);
        assert_eq!(m.get(&memory, &"a"), Some(10));

        memory.rollback(t1);
        assert_eq!(m.len(&memory), 2);
        assert_eq!(m.get(&memory, &"a"), None);
        assert_eq!(sorted_keys(&m, &memory), vec!["b", "c"]);
    }
}
