//! A transactional cell holding a single value.

use std::cell::RefCell;

use super::{normalize_chunks, Memory, Serial};

/// A single value over an arena.
///
/// A read returns the topmost transaction's value, or, if absent, walks downward.
/// A write always targets the top transaction's overlay.
pub struct TxCell<V> {
    chunks: RefCell<Vec<(Serial, V)>>,
}

impl<V: Clone> TxCell<V> {
    /// A fresh cell with `value` written to the top transaction of `memory`.
    pub fn new(memory: &Memory, value: V) -> Self {
        let cell = TxCell {
            chunks: RefCell::default(),
        };
        cell.set(memory, value);
        cell
    }

    /// The current value of the cell.
    ///
    /// # Panics
    /// If every transaction the cell was written under has been rolled back.
    pub fn get(&self, memory: &Memory) -> V {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, |kept, committed| *kept = committed);
        match chunks.last() {
            Some((_, value)) => value.clone(),
            None => panic!("! Read of a cell with no live value"),
        }
    }

    /// Writes `value` to the top transaction's overlay.
    pub fn set(&self, memory: &Memory, value: V) {
        let mut chunks = self.chunks.borrow_mut();
        normalize_chunks(memory, &mut chunks, |kept, committed| *kept = committed);
        let top = memory.top();
        match chunks.last_mut() {
            Some((serial, stored)) if *serial == top => *stored = value,
            _ => chunks.push((top, value)),
        }
    }
}
