/*!
Transactional memory: versioned overlays with scoped commit and rollback.

A [Memory] arena owns an ordered stack of transactions.
The bottom transaction is the base; further transactions are pushed by [begin_transaction](Memory::begin_transaction) and popped by [commit](Memory::commit) --- which merges into the transaction below --- or [rollback](Memory::rollback) --- which discards the transaction and everything above it.

Four cell types sit over an arena:

- [TxCell], a single value.
- [TxSet], a set with `added`/`removed` overlays.
- [TxMap], a map with `removed`/`unique`/`overriding` overlays.
- [TxVec], a count cell paired with an index map.

Reads walk the transaction stack top-down; writes always target the top transaction's overlay.

# Realization

Cells do not hold a reference to their arena; every operation takes the arena as an argument, and each cell owns its own chunk list, tagged by transaction serial.
The arena keeps the live stack and a record of which serial each committed transaction merged into.
Chunk lists are normalized lazily: chunks of rolled-back transactions are dropped, and chunks which resolve to the same live transaction are merged under the chunk-specific rules.
Commit of a non-top transaction slides the transactions above it down one slot, exactly as an eager merge would.

Only a single owner mutates an arena, though cells are interior-mutable so shared solver structures (watch lists, trail metadata) can be updated in place.
*/

pub mod cell;
pub mod map;
pub mod set;
pub mod vector;

pub use cell::TxCell;
pub use map::TxMap;
pub use set::TxSet;
pub use vector::TxVec;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::generic::interning::next_serial;
use crate::misc::log::targets;

/// A transaction serial, unique within an arena.
pub type Serial = u64;

/// An arena of transactional cells.
pub struct Memory {
    /// Identity of the arena, used to key solve-local interned objects.
    serial: u64,

    /// The live transaction stack, bottom first.
    stack: RefCell<Vec<Serial>>,

    /// For each committed transaction, the serial it was merged into.
    merges: RefCell<HashMap<Serial, Serial>>,

    /// The next transaction serial.
    next: Cell<Serial>,
}

/// A handle on a transaction of some arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transaction {
    serial: Serial,
}

impl Default for Memory {
    fn default() -> Self {
        let memory = Memory {
            serial: next_serial(),
            stack: RefCell::default(),
            merges: RefCell::default(),
            next: Cell::new(0),
        };
        // The base transaction.
        memory.begin_transaction();
        memory
    }
}

impl Memory {
    /// A fresh arena, with its base transaction in place.
    pub fn new() -> Self {
        Memory::default()
    }

    /// Identity of the arena.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Pushes a fresh transaction onto the stack.
    pub fn begin_transaction(&self) -> Transaction {
        let serial = self.next.get();
        self.next.set(serial + 1);
        self.stack.borrow_mut().push(serial);
        log::trace!(target: targets::TRANSACTIONAL, "Begin transaction {serial}.");
        Transaction { serial }
    }

    /// Merges `transaction` into the transaction below it.
    ///
    /// The transaction need not be on top of the stack: transactions above it slide down one slot.
    ///
    /// # Panics
    /// If `transaction` is not live, or is the base transaction.
    pub fn commit(&self, transaction: Transaction) {
        let mut stack = self.stack.borrow_mut();
        let index = match stack.iter().position(|s| *s == transaction.serial) {
            Some(index) if index > 0 => index,
            _ => panic!("! Commit of a transaction which is not live above the base"),
        };
        let parent = stack[index - 1];
        stack.remove(index);
        self.merges
            .borrow_mut()
            .insert(transaction.serial, parent);
        log::trace!(target: targets::TRANSACTIONAL, "Commit transaction {} into {parent}.", transaction.serial);
    }

    /// Discards `transaction` and every transaction above it.
    ///
    /// # Panics
    /// If `transaction` is not live.
    pub fn rollback(&self, transaction: Transaction) {
        let mut stack = self.stack.borrow_mut();
        let index = match stack.iter().position(|s| *s == transaction.serial) {
            Some(index) => index,
            None => panic!("! Rollback of a transaction which is not live"),
        };
        stack.truncate(index);
        log::trace!(target: targets::TRANSACTIONAL, "Rollback transaction {}.", transaction.serial);
    }

    /// A scoped transaction, rolled back when dropped unless committed first.
    pub fn begin_scoped(&self) -> ScopedTransaction<'_> {
        ScopedTransaction {
            memory: self,
            transaction: self.begin_transaction(),
            active: Cell::new(true),
        }
    }

    /// The count of live transactions.
    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    /// The serial of the top transaction.
    pub(crate) fn top(&self) -> Serial {
        *self
            .stack
            .borrow()
            .last()
            .expect("! An arena without a base transaction")
    }

    /// Resolves a chunk serial to the live transaction it now belongs to, if any.
    pub(crate) fn resolve(&self, serial: Serial) -> Option<Serial> {
        let stack = self.stack.borrow();
        let merges = self.merges.borrow();
        let mut serial = serial;
        loop {
            if stack.contains(&serial) {
                return Some(serial);
            }
            match merges.get(&serial) {
                Some(parent) => serial = *parent,
                None => return None,
            }
        }
    }
}

/// A transaction which rolls back on drop, for scoped declarations.
///
/// Exactly one of [commit](ScopedTransaction::commit) or rollback happens on every exit path.
pub struct ScopedTransaction<'a> {
    memory: &'a Memory,
    transaction: Transaction,
    active: Cell<bool>,
}

impl ScopedTransaction<'_> {
    /// Commits the scoped transaction instead of rolling back.
    pub fn commit(self) {
        self.active.set(false);
        self.memory.commit(self.transaction);
    }
}

impl Drop for ScopedTransaction<'_> {
    fn drop(&mut self) {
        if self.active.get() {
            self.memory.rollback(self.transaction);
        }
    }
}

/// Normalizes a chunk list against the arena.
///
/// Chunks of rolled-back transactions are dropped, and adjacent chunks which now belong to the same live transaction are merged (earlier chunk absorbing the later) with `merge`.
/// Afterwards the list holds at most one chunk per live transaction, in stack order.
pub(crate) fn normalize_chunks<C>(
    memory: &Memory,
    chunks: &mut Vec<(Serial, C)>,
    mut merge: impl FnMut(&mut C, C),
) {
    let mut normalized: Vec<(Serial, C)> = Vec::with_capacity(chunks.len());
    for (serial, chunk) in chunks.drain(..) {
        match memory.resolve(serial) {
            None => {}
            Some(live) => {
                if let Some((last_serial, last_chunk)) = normalized.last_mut() {
                    if *last_serial == live {
                        merge(last_chunk, chunk);
                        continue;
                    }
                }
                normalized.push((live, chunk));
            }
        }
    }
    *chunks = normalized;
}
