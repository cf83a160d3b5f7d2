//! A transactional set.

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;

use super::{normalize_chunks, Memory, Serial};

/// One transaction's view of the set: keys added here and keys removed here.
///
/// The two parts are always disjoint.
struct SetChunk<K> {
    added: HashSet<K>,
    removed: HashSet<K>,
}

impl<K> Default for SetChunk<K> {
    fn default() -> Self {
        SetChunk {
            added: HashSet::default(),
            removed: HashSet::default(),
        }
    }
}

impl<K: Eq + Hash + Clone> SetChunk<K> {
    /// Absorbs the chunk of a committed child transaction.
    ///
    /// Added and removed sets union respectively, and a key added below then removed above cancels out of both.
    fn absorb(&mut self, committed: SetChunk<K>) {
        debug_assert!(self.added.is_disjoint(&committed.added));
        debug_assert!(self.removed.is_disjoint(&committed.removed));
        let cancelled: Vec<K> = self
            .added
            .intersection(&committed.removed)
            .cloned()
            .collect();
        self.added.extend(committed.added);
        self.removed.extend(committed.removed);
        for key in cancelled {
            self.added.remove(&key);
            self.removed.remove(&key);
        }
    }
}

/// A set over an arena.
///
/// `contains` walks top-down: a key in some overlay's `added` is present, a key in some overlay's `removed` is absent, and otherwise the walk continues.
pub struct TxSet<K> {
    chunks: RefCell<Vec<(Serial, SetChunk<K>)>>,
}

impl<K: Eq + Hash + Clone> TxSet<K> {
    /// A fresh, empty set.
    pub fn new(_memory: &Memory) -> Self {
        TxSet {
            chunks: RefCell::default(),
        }
    }

    /// Adds `key`, if absent.
    pub fn insert(&self, memory: &Memory, key: K) {
        if self.contains(memory, &key) {
            return;
        }
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, SetChunk::absorb);
        let top = Self::top_chunk(memory, &mut chunks);
        if !top.removed.remove(&key) {
            top.added.insert(key);
        }
    }

    /// Removes `key`, if present.
    pub fn remove(&self, memory: &Memory, key: &K) {
        if !self.contains(memory, key) {
            return;
        }
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, SetChunk::absorb);
        let top = Self::top_chunk(memory, &mut chunks);
        if !top.added.remove(key) {
            top.removed.insert(key.clone());
        }
    }

    /// True if `key` is in the set.
    pub fn contains(&self, memory: &Memory, key: &K) -> bool {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, SetChunk::absorb);
        for (_, chunk) in chunks.iter().rev() {
            if chunk.added.contains(key) {
                return true;
            }
            if chunk.removed.contains(key) {
                return false;
            }
        }
        false
    }

    /// The count of keys in the set.
    pub fn len(&self, memory: &Memory) -> usize {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, SetChunk::absorb);
        let count: isize = chunks
            .iter()
            .map(|(_, chunk)| chunk.added.len() as isize - chunk.removed.len() as isize)
            .sum();
        count as usize
    }

    /// True if the set is empty.
    pub fn is_empty(&self, memory: &Memory) -> bool {
        self.len(memory) == 0
    }

    /// The keys of the set, in no particular order.
    pub fn elements(&self, memory: &Memory) -> Vec<K> {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, SetChunk::absorb);
        let mut removed: HashSet<K> = HashSet::default();
        let mut elements = Vec::new();
        for (_, chunk) in chunks.iter().rev() {
            for key in &chunk.added {
                if !removed.contains(key) {
                    elements.push(key.clone());
                }
            }
            removed.extend(chunk.removed.iter().cloned());
        }
        elements
    }

    /// The top transaction's chunk, created on demand.
    fn top_chunk<'c>(
        memory: &Memory,
        chunks: &'c mut Vec<(Serial, SetChunk<K>)>,
    ) -> &'c mut SetChunk<K> {
        let top = memory.top();
        match chunks.last() {
            Some((serial, _)) if *serial == top => {}
            _ => chunks.push((top, SetChunk::default())),
        }
        &mut chunks.last_mut().expect("! Chunk just ensured").1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(set: &TxSet<&'static str>, memory: &Memory) -> Vec<&'static str> {
        let mut elements = set.elements(memory);
        elements.sort();
        elements
    }

    #[test]
    fn basic_operations() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);
        assert_eq!(s.len(&memory), 0);

        s.insert(&memory, "a");
        s.insert(&memory, "b");
        s.insert(&memory, "c");
        s.insert(&memory, "a");
        assert_eq!(s.len(&memory), 3);
        assert!(s.contains(&memory, &"a"));
        assert!(s.contains(&memory, &"b"));
        assert!(s.contains(&memory, &"c"));
        assert!(!s.contains(&memory, &"d"));
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_without_transactions() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);

        s.insert(&memory, "a");
        s.insert(&memory, "b");
        s.insert(&memory, "c");
        assert_eq!(s.len(&memory), 3);

        s.remove(&memory, &"b");
        assert_eq!(sorted(&s, &memory), vec!["a", "c"]);

        s.remove(&memory, &"c");
        assert_eq!(sorted(&s, &memory), vec!["a"]);

        s.remove(&memory, &"a");
        assert_eq!(sorted(&s, &memory), Vec::<&str>::new());
    }

    #[test]
    fn operations_across_transactions() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);

        s.insert(&memory, "a");
        memory.begin_transaction();
        s.insert(&memory, "b");
        memory.begin_transaction();
        s.insert(&memory, "c");
        memory.begin_transaction();
        s.insert(&memory, "a");
        memory.begin_transaction();
        assert_eq!(s.len(&memory), 3);
        assert!(s.contains(&memory, &"a"));
        assert!(s.contains(&memory, &"b"));
        assert!(s.contains(&memory, &"c"));
        assert!(!s.contains(&memory, &"d"));
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_across_transactions() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);

        s.insert(&memory, "a");
        memory.begin_transaction();
        s.insert(&memory, "b");
        memory.begin_transaction();
        s.insert(&memory, "c");
        memory.begin_transaction();
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);

        s.remove(&memory, &"b");
        memory.begin_transaction();
        assert_eq!(sorted(&s, &memory), vec!["a", "c"]);

        s.remove(&memory, &"c");
        memory.begin_transaction();
        assert_eq!(sorted(&s, &memory), vec!["a"]);

        s.remove(&memory, &"a");
        memory.begin_transaction();
        assert_eq!(sorted(&s, &memory), Vec::<&str>::new());
    }

    #[test]
    fn commit_bottom_up() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);
        s.insert(&memory, "a");
        let t1 = memory.begin_transaction();
        s.insert(&memory, "b");
        let t2 = memory.begin_transaction();
        s.insert(&memory, "c");
        let t3 = memory.begin_transaction();
        s.insert(&memory, "a");
        memory.commit(t1);
        memory.commit(t2);
        memory.commit(t3);
        assert_eq!(s.len(&memory), 3);
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_and_commit() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);

        s.insert(&memory, "a");
        s.insert(&memory, "b");
        let t1 = memory.begin_transaction();
        s.insert(&memory, "c");
        s.insert(&memory, "d");
        s.remove(&memory, &"c");
        s.remove(&memory, &"b");
        let t2 = memory.begin_transaction();
        s.insert(&memory, "e");
        s.remove(&memory, &"a");
        assert_eq!(sorted(&s, &memory), vec!["d", "e"]);

        memory.commit(t2);
        assert_eq!(sorted(&s, &memory), vec!["d", "e"]);

        memory.commit(t1);
        assert_eq!(sorted(&s, &memory), vec!["d", "e"]);
    }

    #[test]
    fn rollback_restores_lower_overlays() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);
        s.insert(&memory, "a");
        let t1 = memory.begin_transaction();
        s.insert(&memory, "b");
        memory.begin_transaction();
        s.insert(&memory, "c");
        let t3 = memory.begin_transaction();
        s.insert(&memory, "a");

        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);

        memory.rollback(t3);
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);

        memory.rollback(t1);
        assert_eq!(s.len(&memory), 1);
        assert_eq!(sorted(&s, &memory), vec!["a"]);
    }

    #[test]
    fn remove_and_rollback() {
        let memory = Memory::new();
        let s: TxSet<&str> = TxSet::new(&memory);

        s.insert(&memory, "a");
        s.insert(&memory, "b");
        s.insert(&memory, "c");
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);

        let t1 = memory.begin_transaction();
        s.insert(&memory, "d");
        s.remove(&memory, &"a");
        memory.begin_transaction();
        s.remove(&memory, &"b");
        assert_eq!(sorted(&s, &memory), vec!["c", "d"]);

        memory.rollback(t1);
        assert_eq!(sorted(&s, &memory), vec!["a", "b", "c"]);
    }
}
