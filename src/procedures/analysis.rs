/*!
First-UIP conflict analysis.

Starting from a conflicting clause, resolution proceeds backwards along the trail, most recent literal first, against the antecedents of literals implied at the top decision level.
Resolution stops at the first *unique implication point*: the first literal through which every path from the top decision to the conflict passes.

The result is the learned clause's literals, in decreasing recency: the UIP first, every other literal at a strictly lower level.
Learned clauses are asserting --- after backjumping, the negation of the UIP is immediately derivable.

A max-heap over trail indices drives the most-recent-first order, and a count of unresolved top-level literals detects the UIP: when a single top-level literal remains on the heap, it is the UIP and resolution stops.
*/

use std::collections::{BinaryHeap, HashSet};

use crate::db::clause::Clause;
use crate::db::literal::Literal;
use crate::db::trail::Assignment;
use crate::misc::log::targets;
use crate::transactional::Memory;

impl Assignment {
    /// The first-UIP resolvent of `clause`, which must conflict with the trail.
    ///
    /// Returns the learned literals in decreasing trail recency; the head is the UIP.
    pub fn analyze_conflict(&self, memory: &Memory, clause: &Clause) -> Vec<Literal> {
        debug_assert!(clause.is_conflict(self, memory));

        let top = self.top_decision(memory);
        let mut heap: BinaryHeap<usize> = BinaryHeap::new();
        let mut visited: HashSet<Literal> = HashSet::new();

        // Queues the fresh literals of a clause, counting those at the top decision level.
        let push_literals = |clause: &Clause,
                             heap: &mut BinaryHeap<usize>,
                             visited: &mut HashSet<Literal>|
         -> isize {
            let mut top_level = 0;
            for literal in clause.literals() {
                if !visited.contains(literal) && !visited.contains(&literal.negated()) {
                    heap.push(literal.index(memory));
                    if literal.link(memory) == top || *literal == top {
                        top_level += 1;
                    }
                    visited.insert(literal.clone());
                }
            }
            top_level
        };

        let mut count = push_literals(clause, &mut heap, &mut visited);
        let mut learned: Vec<Literal> = Vec::new();

        while let Some(index) = heap.pop() {
            let literal = self.literals.get(memory, index);
            if literal.link(memory) != top || count == 1 {
                learned.push(literal);
            } else {
                let antecedent = literal
                    .antecedent(memory)
                    .expect("! A top-level implication without an antecedent");
                count += push_literals(&antecedent, &mut heap, &mut visited) - 1;
            }
        }

        log::info!(target: targets::ANALYSIS, "Learned {learned:?}.");
        debug_assert!(!learned.is_empty(), "! Analysis of a conflict yielded nothing");
        learned
    }
}
