/*!
Expressions: interned DAG nodes of the form (symbol, arguments).

Two expressions with equal symbol and structurally equal argument sequences are the same object, so equality is identity and containers key expressions by serial.

Every expression carries a pre-materialized negation: the negation is built the moment a node is interned, and double negation cancels on construction, so `e.negated().negated()` *is* `e`.
A node and its negation keep each other alive; see [interning](crate::generic::interning).

An expression is *tainted* ([has_wrappers](Expr::has_wrappers)) iff it contains any [wrapper](crate::structures::symbol::SymbolKind::Wrapper) node.

The total order on expressions compares the head symbols, then the argument sequences, and finally construction order.
As negations carry the first-ordered symbol, a negated argument always sorts in front of plain variables and applications.
*/

use std::cell::{OnceCell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::generic::interning::{next_serial, WeakTable};
use crate::structures::sort::Sort;
use crate::structures::symbol::{Symbol, SymbolKind};

/// An interned expression.
#[derive(Clone)]
pub struct Expr(pub(crate) Rc<ExprData>);

/// The backing data of an expression.
pub struct ExprData {
    serial: u64,
    symbol: Symbol,
    args: Vec<Expr>,
    has_wrappers: bool,
    negated: OnceCell<Expr>,
}

/// Nodes are keyed by the head symbol and the argument sequence.
type NodeKey = (u64, Vec<u64>);

thread_local! {
    static NODES: RefCell<WeakTable<NodeKey, ExprData>> = RefCell::new(WeakTable::default());
}

impl Expr {
    /// The interned node for `symbol` applied to `args`, bypassing reduction.
    ///
    /// The node is registered before its negation is built, which terminates the mutual recursion between a node and its negation.
    pub(crate) fn node(symbol: &Symbol, args: &[Expr]) -> Expr {
        let key: NodeKey = (symbol.serial(), args.iter().map(Expr::serial).collect());
        if let Some(data) = NODES.with(|nodes| nodes.borrow().get(&key)) {
            return Expr(data);
        }

        let has_wrappers = matches!(symbol.kind(), SymbolKind::Wrapper(_))
            || args.iter().any(Expr::has_wrappers);
        let data = Rc::new(ExprData {
            serial: next_serial(),
            symbol: symbol.clone(),
            args: args.to_vec(),
            has_wrappers,
            negated: OnceCell::new(),
        });
        NODES.with(|nodes| nodes.borrow_mut().insert(key, &data));

        let expr = Expr(data);
        let negated = Symbol::negator(expr.sort()).apply(std::slice::from_ref(&expr));
        // A negator node over this node links back during its own construction.
        let _ = expr.0.negated.set(negated);
        expr
    }

    /// The construction-order serial, unique per expression.
    pub fn serial(&self) -> u64 {
        self.0.serial
    }

    /// The head symbol.
    pub fn symbol(&self) -> &Symbol {
        &self.0.symbol
    }

    /// The arguments.
    pub fn args(&self) -> &[Expr] {
        &self.0.args
    }

    /// The sort of the expression, that of its head symbol.
    pub fn sort(&self) -> Sort {
        self.symbol().sort()
    }

    /// True if the expression contains any wrapper node.
    pub fn has_wrappers(&self) -> bool {
        self.0.has_wrappers
    }

    /// The negation of the expression.
    pub fn negated(&self) -> Expr {
        self.0
            .negated
            .get()
            .expect("! A node without its negation")
            .clone()
    }

    /// Visits every node of the expression exactly once, children before parents.
    ///
    /// An iterative two-color depth-first search; shared nodes are visited once.
    pub fn bottom_up(&self, mut visit: impl FnMut(&Expr)) {
        let mut colors: HashMap<u64, u8> = HashMap::new();
        let mut stack: Vec<Expr> = vec![self.clone()];
        while let Some(expr) = stack.pop() {
            match colors.get(&expr.serial()).copied().unwrap_or(0) {
                0 => {
                    colors.insert(expr.serial(), 1);
                    stack.push(expr.clone());
                    stack.extend(expr.args().iter().rev().cloned());
                }
                1 => {
                    visit(&expr);
                    colors.insert(expr.serial(), 2);
                }
                _ => {}
            }
        }
    }

    /// Folds the expression bottom-up, giving each node its children's computed values.
    pub fn bottom_up_eval<E: Clone>(&self, mut eval: impl FnMut(&Expr, &[E]) -> E) -> E {
        let mut values: HashMap<u64, E> = HashMap::new();
        self.bottom_up(|expr| {
            let child_values: Vec<E> = expr
                .args()
                .iter()
                .map(|arg| values[&arg.serial()].clone())
                .collect();
            let value = eval(expr, &child_values);
            values.insert(expr.serial(), value);
        });
        values
            .remove(&self.serial())
            .expect("! The root was visited")
    }

    /// Rebuilds the expression bottom-up through `transform`.
    ///
    /// Wrapper nodes pass through structurally, with only their children replaced.
    pub fn bottom_up_transform(&self, mut transform: impl FnMut(&Expr, &[Expr]) -> Expr) -> Expr {
        self.bottom_up_eval(|expr, children| match expr.symbol().is_interpreted() {
            true => transform(expr, children),
            false => Expr::node(expr.symbol(), children),
        })
    }

    /// Replaces every key expression of `table` with its mapped value, bottom-up.
    ///
    /// Replacement stops at substituted nodes: the mapped value is taken as-is.
    pub fn substitute(&self, table: &HashMap<Expr, Expr>) -> Expr {
        self.bottom_up_transform(|expr, children| match table.get(expr) {
            Some(replacement) => replacement.clone(),
            None => expr.symbol().apply(children),
        })
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.serial() == other.serial()
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.serial().hash(state);
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.serial() == other.serial() {
            return Ordering::Equal;
        }
        self.symbol()
            .cmp(other.symbol())
            .then_with(|| {
                for (a, b) in self.args().iter().zip(other.args()) {
                    match a.cmp(b) {
                        Ordering::Equal => continue,
                        unequal => return unequal,
                    }
                }
                self.args().len().cmp(&other.args().len())
            })
            .then_with(|| self.serial().cmp(&other.serial()))
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args().is_empty() {
            write!(f, "{:?}", self.symbol())
        } else {
            write!(f, "({:?}", self.symbol())?;
            for arg in self.args() {
                write!(f, " {arg:?}")?;
            }
            write!(f, ")")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::symbol::integer;

    fn int_var() -> Expr {
        Symbol::variable(Sort::Int).apply(&[])
    }

    fn binary_int_fn() -> Symbol {
        Symbol::function(Sort::Int, vec![Sort::Int, Sort::Int])
    }

    #[test]
    fn applications_intern() {
        let a = int_var();
        assert_eq!(a.args().len(), 0);

        let b = binary_int_fn();
        let e2 = b.apply(&[a.clone(), a.clone()]);
        let e3 = b.apply(&[a.clone(), a.clone()]);
        assert!(!e2.has_wrappers());
        assert_eq!(e2.symbol(), &b);
        assert_eq!(e2.args().len(), 2);
        assert_eq!(e2, e3);
    }

    #[test]
    fn ill_sorted_applications_wrap() {
        let a = int_var();
        let b = binary_int_fn();

        let e4 = b.apply(&[a.clone()]);
        let e5 = b.apply(&[a.clone()]);
        assert!(e4.has_wrappers());
        match e4.symbol().kind() {
            SymbolKind::Wrapper(Some(inner)) => assert_eq!(inner, &b),
            _ => panic!("expected a wrapper"),
        }
        assert_eq!(e4.args().len(), 1);
        // A fresh wrapper per failure: the two applications stay distinct.
        assert_ne!(e4, e5);
    }

    #[test]
    fn negation_is_an_involution() {
        let e = int_var();
        assert!(matches!(
            e.negated().symbol().kind(),
            SymbolKind::Negator(Sort::Int)
        ));
        assert_eq!(e.negated().args(), &[e.clone()]);
        assert_eq!(e.negated().negated(), e);
    }

    #[test]
    fn constants_negate_to_constants() {
        assert_eq!(integer(10).negated(), integer(-10));
    }

    #[test]
    fn bottom_up_eval_visits_shared_nodes_once() {
        let (x, y, z) = (integer(1), integer(2), integer(3));
        let b = binary_int_fn();
        let f = b.apply(&[x.clone(), y.clone()]);
        let e = b.apply(&[f.clone(), b.apply(&[z.clone(), f.clone()])]);

        let mut applications = 0;
        let total = e.bottom_up_eval(|expr, children: &[i64]| match expr.symbol().kind() {
            SymbolKind::IntConst(value) => *value,
            SymbolKind::Function { .. } => {
                applications += 1;
                children[0] + children[1]
            }
            _ => panic!("unexpected node"),
        });
        assert_eq!(total, 9);
        assert_eq!(applications, 3);
    }

    #[test]
    fn substitution_is_structural() {
        let (u, v) = (int_var(), int_var());
        let (x, y, z) = (integer(1), integer(2), integer(3));
        let b = binary_int_fn();
        let f = b.apply(&[v.clone(), v.clone()]);
        let e = b.apply(&[
            b.apply(&[f.clone(), f.clone()]),
            b.apply(&[
                b.apply(&[u.clone(), v.clone()]),
                b.apply(&[b.apply(&[x.clone(), y.clone()]), z.clone()]),
            ]),
        ]);

        let table: HashMap<Expr, Expr> = HashMap::from([
            (f.clone(), u.clone()),
            (u.clone(), z.clone()),
        ]);

        let expected = b.apply(&[
            b.apply(&[u.clone(), u.clone()]),
            b.apply(&[
                b.apply(&[z.clone(), v.clone()]),
                b.apply(&[b.apply(&[x, y]), z.clone()]),
            ]),
        ]);
        assert_eq!(e.substitute(&table), expected);
    }
}
