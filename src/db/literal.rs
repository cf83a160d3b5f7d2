/*!
Literals: interned pairs of a boolean expression and a polarity.

A literal and its [negation](Literal::negated) are two interned objects over the same underlying expression, built together: constructing either constructs the other.

The pair shares a single *position record* holding three mutable cells on the solve-local arena:

- `index`: the position in the trail array (zero is the unassigned sentinel slot).
- `link`: the decision literal which introduced the current decision level, the literal itself if it is a decision, or the trail sentinel.
- `antecedent`: the clause which forced the literal by unit propagation, or none for decisions.

The record is keyed by the lesser of the two underlying expressions, so both duals read and write the same cells.
Each literal also owns a transactional vector of the [watches](crate::db::clause::Watch) pointing at it.
*/

use std::cell::{OnceCell, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;

use crate::db::clause::{Clause, Watch};
use crate::generic::interning::{next_serial, WeakTable};
use crate::structures::expr::Expr;
use crate::structures::sort::Sort;
use crate::transactional::{Memory, TxCell, TxVec};

/// An interned literal of some solve.
#[derive(Clone)]
pub struct Literal(pub(crate) Rc<LiteralData>);

/// The backing data of a literal.
pub struct LiteralData {
    serial: u64,
    expr: Expr,
    negated: OnceCell<Literal>,
    position: OnceCell<Rc<LiteralPos>>,
    watches: TxVec<Watch>,
}

/// The trail metadata shared by a literal and its negation.
struct LiteralPos {
    index: TxCell<usize>,
    link: TxCell<Literal>,
    antecedent: TxCell<Option<Clause>>,
}

thread_local! {
    static LITERALS: RefCell<WeakTable<(u64, u64), LiteralData>> =
        RefCell::new(WeakTable::default());
    static POSITIONS: RefCell<WeakTable<(u64, u64), LiteralPos>> =
        RefCell::new(WeakTable::default());
}

impl Literal {
    /// The literal over `expr` in the solve owning `memory`.
    ///
    /// The dual literal and the shared position record are built alongside, once per pair.
    pub fn new(memory: &Memory, expr: &Expr) -> Literal {
        let key = (memory.serial(), expr.serial());
        if let Some(data) = LITERALS.with(|literals| literals.borrow().get(&key)) {
            return Literal(data);
        }
        debug_assert_eq!(expr.sort(), Sort::Bool);

        let data = Rc::new(LiteralData {
            serial: next_serial(),
            expr: expr.clone(),
            negated: OnceCell::new(),
            position: OnceCell::new(),
            watches: TxVec::new(memory),
        });
        LITERALS.with(|literals| literals.borrow_mut().insert(key, &data));
        let literal = Literal(data);

        // The dual's construction terminates on the entry just registered.
        let dual = Literal::new(memory, &expr.negated());
        let _ = literal.0.negated.set(dual);

        let canonical = match *expr < expr.negated() {
            true => expr.clone(),
            false => expr.negated(),
        };
        let position_key = (memory.serial(), canonical.serial());
        let position = match POSITIONS.with(|positions| positions.borrow().get(&position_key)) {
            Some(position) => position,
            None => {
                let position = Rc::new(LiteralPos {
                    index: TxCell::new(memory, 0),
                    link: TxCell::new(memory, Literal::new(memory, &canonical)),
                    antecedent: TxCell::new(memory, None),
                });
                POSITIONS.with(|positions| positions.borrow_mut().insert(position_key, &position));
                position
            }
        };
        let _ = literal.0.position.set(position);

        literal
    }

    /// The construction-order serial, unique per literal.
    pub fn serial(&self) -> u64 {
        self.0.serial
    }

    /// The underlying expression.
    pub fn expr(&self) -> &Expr {
        &self.0.expr
    }

    /// The dual literal.
    pub fn negated(&self) -> Literal {
        self.0
            .negated
            .get()
            .expect("! A literal without its dual")
            .clone()
    }

    /// The watches pointing at this literal.
    pub(crate) fn watches(&self) -> &TxVec<Watch> {
        &self.0.watches
    }

    fn position(&self) -> &LiteralPos {
        self.0
            .position
            .get()
            .expect("! A literal without its position record")
    }

    /// The position of the literal in the trail array.
    pub fn index(&self, memory: &Memory) -> usize {
        self.position().index.get(memory)
    }

    pub(crate) fn set_index(&self, memory: &Memory, index: usize) {
        self.position().index.set(memory, index);
    }

    /// The decision literal of the level the literal was asserted at.
    pub fn link(&self, memory: &Memory) -> Literal {
        self.position().link.get(memory)
    }

    pub(crate) fn set_link(&self, memory: &Memory, link: Literal) {
        self.position().link.set(memory, link);
    }

    /// The clause which forced the literal, or none for decisions.
    pub fn antecedent(&self, memory: &Memory) -> Option<Clause> {
        self.position().antecedent.get(memory)
    }

    pub(crate) fn set_antecedent(&self, memory: &Memory, antecedent: Option<Clause>) {
        self.position().antecedent.set(memory, antecedent);
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.serial() == other.serial()
    }
}

impl Eq for Literal {}

impl std::hash::Hash for Literal {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.serial().hash(state);
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.expr()
            .cmp(other.expr())
            .then_with(|| self.serial().cmp(&other.serial()))
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lit({:?})", self.expr())
    }
}
