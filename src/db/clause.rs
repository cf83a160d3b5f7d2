/*!
Clauses with two watched literals.

A clause is a sorted, deduplicated tuple of [literals](Literal) with two [watches](Watch), each pointing at one of its literals.
Clauses are interned per solve by their literal multiset, so a relearned clause is the stored clause.

The watch scheme avoids scanning a clause until one of its watched literals is falsified:

- A clause [is a conflict](Clause::is_conflict) iff both watched literals are assigned false.
- A clause [derives](Clause::derive) a literal iff it is unit: one watched literal unassigned, the other false.
- When a watched literal is falsified, [update](Watch::update) tries to move the watch to a non-false literal distinct from its neighbour watch; the [suspicious-clause iterator](crate::db::trail::Assignment::suspicious_clause) moves the watch between watch lists accordingly.

A clause of a single literal carries one watch which is its own neighbour.
*/

use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use crate::db::literal::Literal;
use crate::db::trail::Assignment;
use crate::generic::interning::{next_serial, WeakTable};
use crate::transactional::{Memory, TxCell};

/// A watch on one literal of a clause.
#[derive(Clone)]
pub struct Watch(pub(crate) Rc<WatchData>);

/// The backing data of a watch.
pub struct WatchData {
    serial: u64,
    clause: OnceCell<Weak<ClauseData>>,
    neighbour: OnceCell<Weak<WatchData>>,
    literal: OnceCell<TxCell<Literal>>,
}

/// An interned clause of some solve.
#[derive(Clone)]
pub struct Clause(pub(crate) Rc<ClauseData>);

/// The backing data of a clause.
pub struct ClauseData {
    serial: u64,
    literals: Vec<Literal>,
    first: Watch,
    second: Watch,
}

thread_local! {
    static CLAUSES: RefCell<WeakTable<(u64, Vec<u64>), ClauseData>> =
        RefCell::new(WeakTable::default());
}

impl Clause {
    /// The clause over `literals` in the solve owning `memory`.
    ///
    /// Duplicates are dropped and the stored tuple is sorted; the watches go to the first two distinct literals in call order.
    /// For a learned clause this places one watch on the asserting literal and one on the most recent of the rest.
    pub fn new(memory: &Memory, literals: &[Literal]) -> Clause {
        assert!(!literals.is_empty(), "! An empty clause");

        let mut unique: Vec<Literal> = Vec::new();
        for literal in literals {
            if !unique.contains(literal) {
                unique.push(literal.clone());
            }
        }
        let mut sorted = unique.clone();
        sorted.sort();

        let key = (
            memory.serial(),
            sorted.iter().map(Literal::serial).collect::<Vec<_>>(),
        );
        if let Some(data) = CLAUSES.with(|clauses| clauses.borrow().get(&key)) {
            return Clause(data);
        }

        let first = Watch::fresh();
        let second = match unique.len() > 1 {
            true => Watch::fresh(),
            false => first.clone(),
        };

        let data = Rc::new(ClauseData {
            serial: next_serial(),
            literals: sorted,
            first: first.clone(),
            second: second.clone(),
        });
        let _ = first.0.clause.set(Rc::downgrade(&data));
        let _ = second.0.clause.set(Rc::downgrade(&data));

        if unique.len() > 1 {
            let _ = first.0.neighbour.set(Rc::downgrade(&second.0));
            let _ = second.0.neighbour.set(Rc::downgrade(&first.0));
            let _ = first.0.literal.set(TxCell::new(memory, unique[0].clone()));
            unique[0].watches().push(memory, first);
            let _ = second.0.literal.set(TxCell::new(memory, unique[1].clone()));
            unique[1].watches().push(memory, second);
        } else {
            let _ = first.0.neighbour.set(Rc::downgrade(&first.0));
            let _ = first.0.literal.set(TxCell::new(memory, unique[0].clone()));
            unique[0].watches().push(memory, first);
        }

        CLAUSES.with(|clauses| clauses.borrow_mut().insert(key, &data));
        Clause(data)
    }

    /// The construction-order serial, unique per clause.
    pub fn serial(&self) -> u64 {
        self.0.serial
    }

    /// The literals of the clause, sorted.
    pub fn literals(&self) -> &[Literal] {
        &self.0.literals
    }

    /// True iff both watched literals are assigned false.
    pub fn is_conflict(&self, assignment: &Assignment, memory: &Memory) -> bool {
        let p = self.0.first.literal(memory);
        let q = self.0.second.literal(memory);
        assignment.value(memory, &p) == Some(false) && assignment.value(memory, &q) == Some(false)
    }

    /// The literal the clause asserts under `assignment`, if the clause is unit.
    pub fn derive(&self, assignment: &Assignment, memory: &Memory) -> Option<Literal> {
        let p = self.0.first.literal(memory);
        let q = self.0.second.literal(memory);
        if (assignment.value(memory, &p) == Some(false) || p == q)
            && assignment.value(memory, &q).is_none()
        {
            return Some(q);
        }
        if assignment.value(memory, &q) == Some(false) && assignment.value(memory, &p).is_none() {
            return Some(p);
        }
        None
    }
}

impl Watch {
    fn fresh() -> Watch {
        Watch(Rc::new(WatchData {
            serial: next_serial(),
            clause: OnceCell::new(),
            neighbour: OnceCell::new(),
            literal: OnceCell::new(),
        }))
    }

    /// The clause the watch belongs to.
    pub fn clause(&self) -> Clause {
        Clause(
            self.0
                .clause
                .get()
                .and_then(Weak::upgrade)
                .expect("! A watch without its clause"),
        )
    }

    /// The other watch of the clause; itself for a unit clause.
    fn neighbour(&self) -> Watch {
        Watch(
            self.0
                .neighbour
                .get()
                .and_then(Weak::upgrade)
                .expect("! A watch without its neighbour"),
        )
    }

    /// The literal currently watched.
    pub fn literal(&self, memory: &Memory) -> Literal {
        self.0
            .literal
            .get()
            .expect("! A watch without a literal")
            .get(memory)
    }

    /// Attempts to move the watch to a non-false literal of its clause, distinct from the neighbour watch.
    /// Returns false when no such literal exists: the clause is then suspicious --- unit, conflicting, or satisfied through the neighbour.
    pub(crate) fn update(&self, assignment: &Assignment, memory: &Memory) -> bool {
        debug_assert_eq!(assignment.value(memory, &self.literal(memory)), Some(false));
        let neighbour_literal = self.neighbour().literal(memory);
        let clause = self.clause();
        for candidate in clause.literals() {
            if *candidate != neighbour_literal
                && assignment.value(memory, candidate) != Some(false)
            {
                self.0
                    .literal
                    .get()
                    .expect("! A watch without a literal")
                    .set(memory, candidate.clone());
                return true;
            }
        }
        false
    }
}

impl PartialEq for Clause {
    fn eq(&self, other: &Self) -> bool {
        self.serial() == other.serial()
    }
}

impl Eq for Clause {}

impl std::hash::Hash for Clause {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.serial().hash(state);
    }
}

impl PartialEq for Watch {
    fn eq(&self, other: &Self) -> bool {
        self.0.serial == other.0.serial
    }
}

impl Eq for Watch {}

impl std::fmt::Debug for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.literals()).finish()
    }
}
