/*!
The assignment trail.

An [Assignment] holds the literals of a solve in an array with a sentinel at index zero.
Positions `[1, border)` hold literals *placed* on the trail, in trail order; positions `[border, end)` hold the unassigned literals, and the engine takes its next decision from the border.

Placing a literal falsifies it: [value](Assignment::value) of a literal is false when the trail stores the literal itself below the border, true when it stores the dual, and none otherwise.
Decisions place the next unassigned literal directly --- asserting its negation --- and implications place the negation of the derived literal.

Decision levels are encoded by link chains: the sentinel links to the first decision, each decision links to itself, and each implied literal links to the decision of its level.
[Backtracking](Assignment::backtrack) to a decision rewinds the border to that decision's trail position.

Propagation is organized around the resumable [suspicious-clause iterator](Assignment::suspicious_clause): a cursor `(i, j)` walks the watch lists of falsified trail literals, moving watches where possible and yielding the clauses whose watches cannot move for the caller to inspect.
The border may grow between calls; the iterator picks up where it left off.
*/

use crate::db::clause::Clause;
use crate::db::literal::Literal;
use crate::misc::log::targets;
use crate::structures::sort::Sort;
use crate::structures::symbol::Symbol;
use crate::transactional::{Memory, TxCell, TxVec};

/// The assignment trail of a solve.
pub struct Assignment {
    /// The sentinel, over an engine-private expression so no input literal collides with it.
    pub(crate) sentinel: Literal,

    /// The decision literal of the top decision level; the sentinel before any decision.
    pub(crate) top_decision: TxCell<Literal>,

    /// The trail array; index zero holds the sentinel.
    pub(crate) literals: TxVec<Literal>,

    /// Positions `[1, border)` are assigned.
    pub(crate) border: TxCell<usize>,

    /// Trail cursor of the suspicious-clause iterator.
    cursor_i: TxCell<usize>,

    /// Watch-list cursor of the suspicious-clause iterator.
    cursor_j: TxCell<usize>,
}

impl Assignment {
    /// A trail over `literals`, all unassigned, in the given order.
    pub fn new(memory: &Memory, literals: &[Literal]) -> Assignment {
        let private = Symbol::variable(Sort::Bool).apply(&[]);
        let sentinel = Literal::new(memory, &private);
        sentinel.set_link(memory, sentinel.clone());

        let trail = TxVec::new(memory);
        trail.push(memory, sentinel.clone());
        for literal in literals {
            literal.set_index(memory, trail.len(memory));
            trail.push(memory, literal.clone());
        }

        Assignment {
            top_decision: TxCell::new(memory, sentinel.clone()),
            sentinel,
            literals: trail,
            border: TxCell::new(memory, 1),
            cursor_i: TxCell::new(memory, 1),
            cursor_j: TxCell::new(memory, 0),
        }
    }

    /// The sentinel literal.
    pub fn sentinel(&self) -> &Literal {
        &self.sentinel
    }

    /// The decision literal of the top decision level.
    pub fn top_decision(&self, memory: &Memory) -> Literal {
        self.top_decision.get(memory)
    }

    /// The count of trail slots, including the sentinel slot.
    pub fn len(&self, memory: &Memory) -> usize {
        self.literals.len(memory)
    }

    /// True if the trail holds no literals beyond the sentinel.
    pub fn is_empty(&self, memory: &Memory) -> bool {
        self.len(memory) == 1
    }

    /// The literal stored at `index`.
    pub fn literal_at(&self, memory: &Memory, index: usize) -> Literal {
        self.literals.get(memory, index)
    }

    /// The border between assigned and unassigned trail positions.
    pub fn border(&self, memory: &Memory) -> usize {
        self.border.get(memory)
    }

    /// The value of `literal`: false if placed itself, true if its dual is placed, none if unassigned.
    pub fn value(&self, memory: &Memory, literal: &Literal) -> Option<bool> {
        let index = literal.index(memory);
        debug_assert!(0 < index && index < self.len(memory));
        let stored = self.literals.get(memory, index);
        debug_assert!(stored == *literal || stored == literal.negated());
        match index < self.border.get(memory) {
            true => Some(stored == literal.negated()),
            false => None,
        }
    }

    /// Decides `literal`, opening a fresh decision level.
    pub fn make_decision(&self, memory: &Memory, literal: &Literal) {
        log::trace!(target: targets::PROPAGATION, "Decision: {literal:?}.");
        self.place(memory, literal);
        literal.set_link(memory, literal.clone());
        literal.set_antecedent(memory, None);
        let previous_top = self.top_decision.get(memory);
        previous_top.set_link(memory, literal.clone());
        self.top_decision.set(memory, literal.clone());
    }

    /// Places `literal` as an implication of `antecedent` at the current level.
    pub fn make_implication(&self, memory: &Memory, literal: &Literal, antecedent: &Clause) {
        log::trace!(target: targets::PROPAGATION, "Implication: {literal:?} from {antecedent:?}.");
        self.place(memory, literal);
        literal.set_link(memory, self.top_decision.get(memory));
        literal.set_antecedent(memory, Some(antecedent.clone()));
    }

    /// Swaps `literal` to the border slot and advances the border over it.
    fn place(&self, memory: &Memory, literal: &Literal) {
        debug_assert!(self.value(memory, literal).is_none());
        let border = self.border.get(memory);
        let index = literal.index(memory);
        if index != border {
            let border_literal = self.literals.get(memory, border);
            self.literals.set(memory, index, border_literal.clone());
            border_literal.set_index(memory, index);
            literal.set_index(memory, border);
        }
        self.literals.set(memory, border, literal.clone());
        self.border.set(memory, border + 1);
    }

    /// The next clause one of whose watches sits on a falsified literal and cannot move.
    ///
    /// A watch which can move is moved between watch lists and not yielded.
    /// The yielded clause may be conflicting, unit, or satisfied through its other watch; the caller inspects.
    /// Returns none once every placed literal's watch list has been exhausted; the iterator resumes after the border grows.
    pub fn suspicious_clause(&self, memory: &Memory) -> Option<Clause> {
        loop {
            let i = self.cursor_i.get(memory);
            if i == self.border.get(memory) {
                return None;
            }
            let literal = self.literals.get(memory, i);
            let j = self.cursor_j.get(memory);
            if j == literal.watches().len(memory) {
                self.cursor_i.set(memory, i + 1);
                self.cursor_j.set(memory, 0);
                continue;
            }
            let watch = literal.watches().get(memory, j);
            let watched_literal = watch.literal(memory);
            if !watch.update(self, memory) {
                self.cursor_j.set(memory, j + 1);
                return Some(watch.clause());
            }
            watched_literal.watches().remove_by_pop(memory, j);
            watch.literal(memory).watches().push(memory, watch.clone());
        }
    }

    /// Rewinds the trail so `literal` --- a decision assigned false --- is the next unassigned literal.
    pub fn backtrack(&self, memory: &Memory, literal: &Literal) {
        debug_assert_eq!(self.value(memory, literal), Some(false));
        debug_assert!(literal.antecedent(memory).is_none());
        let index = literal.index(memory);
        log::trace!(target: targets::BACKJUMP, "Backtrack to {literal:?} at {index}.");

        self.border.set(memory, index);
        if self.cursor_i.get(memory) >= index {
            self.cursor_i.set(memory, index);
            self.cursor_j.set(memory, 0);
        }

        let last = self.literals.get(memory, index - 1);
        let mut top = last.link(memory);
        if top == *literal {
            top = last;
        }
        top.set_link(memory, top.clone());
        self.top_decision.set(memory, top);
    }
}
